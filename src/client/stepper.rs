//! Quantity stepper and price display for the order form.

use std::fmt;

use serde_json::Value;

pub const MIN_QUANTITY: i64 = 1;

/// Quantity control with `+`/`-` buttons and a free-text input.
///
/// The value never drops below [`MIN_QUANTITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper {
    value: i64,
}

impl Default for QuantityStepper {
    fn default() -> Self {
        Self {
            value: MIN_QUANTITY,
        }
    }
}

impl QuantityStepper {
    pub fn new(value: i64) -> Self {
        Self {
            value: value.max(MIN_QUANTITY),
        }
    }

    /// Read the stepper back from a form value. Anything that is not a
    /// usable number starts the stepper at 1.
    pub fn from_value(value: Option<&Value>) -> Self {
        let parsed = match value {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => parse_leading_int(s),
            _ => None,
        };
        parsed.map(Self::new).unwrap_or_default()
    }

    pub fn value(self) -> i64 {
        self.value
    }

    pub fn increment(&mut self) {
        self.value = self.value.saturating_add(1);
    }

    /// No effect at the minimum.
    pub fn decrement(&mut self) {
        if self.can_decrement() {
            self.value -= 1;
        }
    }

    pub fn can_decrement(self) -> bool {
        self.value > MIN_QUANTITY
    }

    /// Apply typed input. Text without a leading integer and integers below
    /// the minimum both reset to the minimum.
    pub fn set_input(&mut self, text: &str) {
        self.value = parse_leading_int(text).map_or(MIN_QUANTITY, |parsed| parsed.max(MIN_QUANTITY));
    }
}

/// Leading-integer parse: optional sign then digits, trailing text ignored.
/// `"12 boxes"` is 12, `"boxes"` is `None`.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['-', '+']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}

/// Whole-cent amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn cents(self) -> u64 {
        self.cents
    }

    pub fn times(self, quantity: i64) -> Self {
        let quantity = u64::try_from(quantity.max(0)).unwrap_or(0);
        Self {
            cents: self.cents.saturating_mul(quantity),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

/// Fixed unit price for the single product on sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    unit_price: Money,
}

impl Default for Pricing {
    fn default() -> Self {
        Self::new(9999)
    }
}

impl Pricing {
    pub fn new(unit_price_cents: u64) -> Self {
        Self {
            unit_price: Money::from_cents(unit_price_cents),
        }
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Shipping is always free, so subtotal and total match.
    pub fn summary(&self, quantity: i64) -> PriceSummary {
        let subtotal = self.unit_price.times(quantity);
        PriceSummary {
            quantity,
            subtotal,
            total: subtotal,
        }
    }
}

/// Display-only order totals. Never sent to or checked by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSummary {
    pub quantity: i64,
    pub subtotal: Money,
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decrement_at_one_stays_at_one() {
        let mut stepper = QuantityStepper::default();
        assert!(!stepper.can_decrement());
        stepper.decrement();
        assert_eq!(stepper.value(), 1);
    }

    #[test]
    fn test_increment_adds_exactly_one() {
        for start in [1, 2, 9, 99] {
            let mut stepper = QuantityStepper::new(start);
            stepper.increment();
            assert_eq!(stepper.value(), start + 1);
        }
    }

    #[test]
    fn test_decrement_above_one() {
        let mut stepper = QuantityStepper::new(3);
        stepper.decrement();
        assert_eq!(stepper.value(), 2);
        stepper.decrement();
        stepper.decrement();
        assert_eq!(stepper.value(), 1);
    }

    #[test]
    fn test_new_clamps_to_minimum() {
        assert_eq!(QuantityStepper::new(0).value(), 1);
        assert_eq!(QuantityStepper::new(-5).value(), 1);
    }

    #[test]
    fn test_set_input_parses_numbers() {
        let mut stepper = QuantityStepper::new(2);
        stepper.set_input("7");
        assert_eq!(stepper.value(), 7);
        stepper.set_input(" 12 boxes");
        assert_eq!(stepper.value(), 12);
    }

    #[test]
    fn test_set_input_non_numeric_resets_to_one() {
        for text in ["lots", "", "-"] {
            let mut stepper = QuantityStepper::new(4);
            stepper.set_input(text);
            assert_eq!(stepper.value(), 1, "input {text:?}");
        }
    }

    #[test]
    fn test_set_input_below_minimum_clamps() {
        let mut stepper = QuantityStepper::new(4);
        stepper.set_input("0");
        assert_eq!(stepper.value(), 1);
        stepper.set_input("-3");
        assert_eq!(stepper.value(), 1);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(QuantityStepper::from_value(Some(&json!(5))).value(), 5);
        assert_eq!(QuantityStepper::from_value(Some(&json!("6"))).value(), 6);
        assert_eq!(QuantityStepper::from_value(Some(&json!("six"))).value(), 1);
        assert_eq!(QuantityStepper::from_value(Some(&json!(0))).value(), 1);
        assert_eq!(QuantityStepper::from_value(None).value(), 1);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(9999).to_string(), "$99.99");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(123456).to_string(), "$1234.56");
    }

    #[test]
    fn test_summary_multiplies_unit_price() {
        let pricing = Pricing::default();
        let summary = pricing.summary(3);
        assert_eq!(summary.subtotal.to_string(), "$299.97");
        assert_eq!(summary.total, summary.subtotal);
        assert_eq!(summary.quantity, 3);
    }

    #[test]
    fn test_summary_never_negative() {
        let summary = Pricing::new(100).summary(-2);
        assert_eq!(summary.total.cents(), 0);
    }
}
