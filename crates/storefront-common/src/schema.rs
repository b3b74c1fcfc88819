//! Declarative validation rules for intake payloads.
//!
//! Each record kind has a static [`Schema`]: an ordered table of fields, each
//! with an expected [`FieldKind`] and an ordered list of [`Rule`]s. A field
//! reports only its first failing rule, and failures come back in table order,
//! so the same input always yields the same error list.
//!
//! Fields not named in a schema are dropped, which is how a caller-supplied
//! `id` is kept out of an insert record.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{InsertComplaint, InsertOrder, InsertUser};

pub const REQUIRED: &str = "Required";
pub const EXPECTED_STRING: &str = "Expected string";
pub const EXPECTED_NUMBER: &str = "Expected number";
pub const EXPECTED_INTEGER: &str = "Expected integer";
pub const NUMBER_OUT_OF_RANGE: &str = "Number is out of range";
pub const EXPECTED_OBJECT: &str = "Expected object";

pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const PHONE_TOO_SHORT: &str = "Phone number must be at least 10 digits";
pub const COMPLAINT_TOO_SHORT: &str = "Complaint must be at least 10 characters";
pub const QUANTITY_TOO_LOW: &str = "Quantity must be at least 1";

/// Pseudo-field that carries errors about the payload as a whole.
pub const BODY_FIELD: &str = "body";

pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

impl FieldKind {
    /// Check the JSON type of a present value. Integral floats such as `3.0`
    /// are normalized to integers.
    fn coerce(self, value: &Value) -> Result<Value, &'static str> {
        match (self, value) {
            (FieldKind::Text, Value::String(_)) => Ok(value.clone()),
            (FieldKind::Text, _) => Err(EXPECTED_STRING),
            (FieldKind::Integer, Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Value::from(i));
                }
                if n.is_u64() {
                    return Err(NUMBER_OUT_OF_RANGE);
                }
                match n.as_f64() {
                    Some(f) if f.fract() != 0.0 => Err(EXPECTED_INTEGER),
                    Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(Value::from(f as i64))
                    }
                    _ => Err(NUMBER_OUT_OF_RANGE),
                }
            }
            (FieldKind::Integer, _) => Err(EXPECTED_NUMBER),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// String length in Unicode scalar values.
    MinChars(usize),
    /// Inclusive lower bound on an integer.
    AtLeast(i64),
}

impl Check {
    pub fn passes(self, value: &Value) -> bool {
        match (self, value) {
            (Check::MinChars(min), Value::String(s)) => s.chars().count() >= min,
            (Check::AtLeast(min), Value::Number(n)) => n.as_i64().is_some_and(|v| v >= min),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: Check,
    pub message: &'static str,
}

#[derive(Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
}

impl FieldRule {
    /// Validate one field value, returning the normalized value or the
    /// message of the first failing rule.
    pub fn check(&self, value: Option<&Value>) -> Result<Value, &'static str> {
        let value = match value {
            None | Some(Value::Null) => return Err(REQUIRED),
            Some(value) => self.kind.coerce(value)?,
        };
        match self.rules.iter().find(|rule| !rule.check.passes(&value)) {
            Some(rule) => Err(rule.message),
            None => Ok(value),
        }
    }
}

#[derive(Debug)]
pub struct Schema {
    pub record: &'static str,
    pub fields: &'static [FieldRule],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a single field, e.g. while a form field is being edited.
    /// Fields the schema does not know are accepted, since they are dropped
    /// on submit anyway.
    pub fn validate_field(&self, name: &str, value: &Value) -> Result<(), &'static str> {
        match self.field(name) {
            Some(rule) => rule.check(Some(value)).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Validate a raw payload, returning only the schema's fields with
    /// normalized values.
    pub fn validate(&self, raw: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let Some(object) = raw.as_object() else {
            return Err(ValidationErrors::single(BODY_FIELD, EXPECTED_OBJECT));
        };

        let mut accepted = Map::new();
        let mut errors = ValidationErrors::default();
        for field in self.fields {
            match field.check(object.get(field.name)) {
                Ok(value) => {
                    accepted.insert(field.name.to_string(), value);
                }
                Err(message) => errors.push(field.name, message),
            }
        }

        if errors.is_empty() {
            Ok(accepted)
        } else {
            Err(errors)
        }
    }
}

const NAME_FIELD: FieldRule = FieldRule {
    name: "name",
    kind: FieldKind::Text,
    rules: &[Rule {
        check: Check::MinChars(2),
        message: NAME_TOO_SHORT,
    }],
};

const PHONE_FIELD: FieldRule = FieldRule {
    name: "phone",
    kind: FieldKind::Text,
    rules: &[Rule {
        check: Check::MinChars(10),
        message: PHONE_TOO_SHORT,
    }],
};

pub static COMPLAINT_SCHEMA: Schema = Schema {
    record: "complaint",
    fields: &[
        NAME_FIELD,
        PHONE_FIELD,
        FieldRule {
            name: "complaint",
            kind: FieldKind::Text,
            rules: &[Rule {
                check: Check::MinChars(10),
                message: COMPLAINT_TOO_SHORT,
            }],
        },
    ],
};

pub static ORDER_SCHEMA: Schema = Schema {
    record: "order",
    fields: &[
        NAME_FIELD,
        PHONE_FIELD,
        FieldRule {
            name: "quantity",
            kind: FieldKind::Integer,
            rules: &[Rule {
                check: Check::AtLeast(1),
                message: QUANTITY_TOO_LOW,
            }],
        },
    ],
};

pub static USER_SCHEMA: Schema = Schema {
    record: "user",
    fields: &[
        FieldRule {
            name: "username",
            kind: FieldKind::Text,
            rules: &[],
        },
        FieldRule {
            name: "password",
            kind: FieldKind::Text,
            rules: &[],
        },
    ],
};

/// An insert record that can be built from untrusted JSON.
pub trait Validate: Sized + DeserializeOwned {
    fn schema() -> &'static Schema;

    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let fields = Self::schema().validate(raw)?;
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| ValidationErrors::single(BODY_FIELD, e.to_string()))
    }
}

impl Validate for InsertComplaint {
    fn schema() -> &'static Schema {
        &COMPLAINT_SCHEMA
    }
}

impl Validate for InsertOrder {
    fn schema() -> &'static Schema {
        &ORDER_SCHEMA
    }
}

impl Validate for InsertUser {
    fn schema() -> &'static Schema {
        &USER_SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-scoped validation failures, one per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Wire format of a `400` validation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailureBody {
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl From<ValidationErrors> for ValidationFailureBody {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            message: VALIDATION_FAILED_MESSAGE.to_string(),
            errors: errors.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_complaint_is_accepted() {
        let raw = json!({"name": "Jo", "phone": "1234567890", "complaint": "Too slow shipping"});
        let insert = InsertComplaint::validate(&raw).unwrap();
        assert_eq!(insert.name, "Jo");
        assert_eq!(insert.phone, "1234567890");
        assert_eq!(insert.complaint, "Too slow shipping");
    }

    #[test]
    fn test_short_complaint_fields_report_one_error_each_in_order() {
        let raw = json!({"name": "J", "phone": "123", "complaint": "bad"});
        let errors = InsertComplaint::validate(&raw).unwrap_err();

        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "phone", "complaint"]);
        assert_eq!(errors.message_for("name"), Some(NAME_TOO_SHORT));
        assert_eq!(errors.message_for("phone"), Some(PHONE_TOO_SHORT));
        assert_eq!(errors.message_for("complaint"), Some(COMPLAINT_TOO_SHORT));
    }

    #[test]
    fn test_phone_digits_are_not_enforced() {
        let raw = json!({"name": "Jo", "phone": "call me please", "complaint": "Too slow shipping"});
        assert!(InsertComplaint::validate(&raw).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Two characters, four bytes.
        let raw = json!({"name": "Ñé", "phone": "1234567890", "quantity": 1});
        assert!(InsertOrder::validate(&raw).is_ok());

        let raw = json!({"name": "Ñ", "phone": "1234567890", "quantity": 1});
        let errors = InsertOrder::validate(&raw).unwrap_err();
        assert_eq!(errors.message_for("name"), Some(NAME_TOO_SHORT));
    }

    #[test]
    fn test_missing_and_null_fields_are_required() {
        let raw = json!({"name": null, "complaint": "Too slow shipping"});
        let errors = InsertComplaint::validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for("name"), Some(REQUIRED));
        assert_eq!(errors.message_for("phone"), Some(REQUIRED));
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let raw = json!({"name": 42, "phone": "5551234567", "quantity": "3"});
        let errors = InsertOrder::validate(&raw).unwrap_err();
        assert_eq!(errors.message_for("name"), Some(EXPECTED_STRING));
        assert_eq!(errors.message_for("quantity"), Some(EXPECTED_NUMBER));
    }

    #[test]
    fn test_quantity_below_one_is_rejected() {
        for quantity in [0, -1, -100] {
            let raw = json!({"name": "Ann Lee", "phone": "5551234567", "quantity": quantity});
            let errors = InsertOrder::validate(&raw).unwrap_err();
            assert_eq!(errors.message_for("quantity"), Some(QUANTITY_TOO_LOW));
        }
    }

    #[test]
    fn test_fractional_quantity_is_rejected() {
        let raw = json!({"name": "Ann Lee", "phone": "5551234567", "quantity": 2.5});
        let errors = InsertOrder::validate(&raw).unwrap_err();
        assert_eq!(errors.message_for("quantity"), Some(EXPECTED_INTEGER));
    }

    #[test]
    fn test_integer_beyond_i64_is_out_of_range() {
        let huge: Value = serde_json::from_str("10000000000000000000").unwrap();
        let huge_float: Value = serde_json::from_str("1e19").unwrap();
        for quantity in [huge, huge_float] {
            let raw = json!({"name": "Ann Lee", "phone": "5551234567", "quantity": quantity});
            let errors = InsertOrder::validate(&raw).unwrap_err();
            assert_eq!(errors.message_for("quantity"), Some(NUMBER_OUT_OF_RANGE));
        }
    }

    #[test]
    fn test_integral_float_quantity_is_normalized() {
        let raw = json!({"name": "Ann Lee", "phone": "5551234567", "quantity": 3.0});
        let insert = InsertOrder::validate(&raw).unwrap();
        assert_eq!(insert.quantity, 3);
    }

    #[test]
    fn test_caller_supplied_id_and_extra_fields_are_stripped() {
        let raw = json!({
            "id": "forged",
            "name": "Ann Lee",
            "phone": "5551234567",
            "quantity": 1,
            "coupon": "FREE",
        });
        let fields = ORDER_SCHEMA.validate(&raw).unwrap();
        assert!(!fields.contains_key("id"));
        assert!(!fields.contains_key("coupon"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_non_object_payload_is_a_body_error() {
        for raw in [json!([1, 2]), json!("text"), json!(null)] {
            let errors = InsertComplaint::validate(&raw).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.message_for(BODY_FIELD), Some(EXPECTED_OBJECT));
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let raw = json!({"name": "J", "phone": "555", "quantity": 0});
        let first = InsertOrder::validate(&raw).unwrap_err();
        let second = InsertOrder::validate(&raw).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_validate_field_checks_one_field() {
        assert_eq!(
            COMPLAINT_SCHEMA.validate_field("phone", &json!("555")),
            Err(PHONE_TOO_SHORT)
        );
        assert_eq!(COMPLAINT_SCHEMA.validate_field("phone", &json!("5551234567")), Ok(()));
        assert_eq!(COMPLAINT_SCHEMA.validate_field("unknown", &json!(1)), Ok(()));
    }

    #[test]
    fn test_user_schema_requires_both_strings() {
        let raw = json!({"username": "ann"});
        let errors = InsertUser::validate(&raw).unwrap_err();
        assert_eq!(errors.message_for("password"), Some(REQUIRED));

        let raw = json!({"username": "ann", "password": "hunter2"});
        assert!(InsertUser::validate(&raw).is_ok());
    }

    #[test]
    fn test_failure_body_wire_format() {
        let errors = ValidationErrors::single("name", NAME_TOO_SHORT);
        let body = ValidationFailureBody::from(errors);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "message": "Validation failed",
                "errors": [{"field": "name", "message": "Name must be at least 2 characters"}],
            })
        );
    }

    #[test]
    fn test_validation_errors_display_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.push("name", NAME_TOO_SHORT);
        errors.push("phone", PHONE_TOO_SHORT);
        assert_eq!(
            errors.to_string(),
            "validation failed: name: Name must be at least 2 characters; phone: Phone number must be at least 10 digits"
        );
    }
}
