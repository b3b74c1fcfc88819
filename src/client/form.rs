//! Client-side submission forms.
//!
//! A [`Form`] holds the raw field values the user has entered, the inline
//! error for each invalid field, and a small state machine:
//!
//! ```text
//! Idle ──begin_submit──> Validating ──invalid──> Idle (field errors)
//!                             │
//!                           valid
//!                             v
//!                        Submitting ──finish(Ok)──> Idle (reset, success)
//!                                   └─finish(Err)─> Idle (values kept, failure)
//! ```
//!
//! Field values are checked against the same schema the server uses.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value, json};
use storefront_common::{
    Complaint, FieldError, InsertComplaint, InsertOrder, Order, Validate, ValidationErrors,
};
use tracing::{debug, info, warn};

use super::http::IntakeClient;
use super::notify::Notification;
use super::stepper::{MIN_QUANTITY, PriceSummary, Pricing, QuantityStepper};
use crate::errors::{FormError, SubmitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
}

/// What a particular form submits and how it reports the outcome.
#[async_trait]
pub trait FormKind: Send + Sync + 'static {
    type Insert: Validate + Serialize + Send + Sync;
    type Record: Send;

    /// Initial field values, restored after a successful submit.
    fn defaults() -> Map<String, Value>;

    fn success() -> Notification;

    fn failure() -> Notification;

    async fn send(client: &IntakeClient, insert: &Self::Insert) -> Result<Self::Record, SubmitError>;
}

pub struct ComplaintForm;

pub struct OrderForm;

pub const COMPLAINT_SUBMITTED: Notification = Notification::success(
    "Complaint Submitted",
    "Thank you for your feedback. We'll get back to you soon.",
);
pub const COMPLAINT_FAILED: Notification = Notification::failure("Submission Failed");
pub const ORDER_PLACED: Notification = Notification::success(
    "Order Placed Successfully!",
    "Thank you for your purchase. We'll contact you shortly.",
);
pub const ORDER_FAILED: Notification = Notification::failure("Order Failed");

#[async_trait]
impl FormKind for ComplaintForm {
    type Insert = InsertComplaint;
    type Record = Complaint;

    fn defaults() -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".into(), json!(""));
        values.insert("phone".into(), json!(""));
        values.insert("complaint".into(), json!(""));
        values
    }

    fn success() -> Notification {
        COMPLAINT_SUBMITTED
    }

    fn failure() -> Notification {
        COMPLAINT_FAILED
    }

    async fn send(client: &IntakeClient, insert: &InsertComplaint) -> Result<Complaint, SubmitError> {
        client.submit_complaint(insert).await
    }
}

#[async_trait]
impl FormKind for OrderForm {
    type Insert = InsertOrder;
    type Record = Order;

    fn defaults() -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("name".into(), json!(""));
        values.insert("phone".into(), json!(""));
        values.insert("quantity".into(), json!(MIN_QUANTITY));
        values
    }

    fn success() -> Notification {
        ORDER_PLACED
    }

    fn failure() -> Notification {
        ORDER_FAILED
    }

    async fn send(client: &IntakeClient, insert: &InsertOrder) -> Result<Order, SubmitError> {
        client.submit_order(insert).await
    }
}

/// How a submission that reached the server ended.
#[derive(Debug)]
pub enum SubmitOutcome<R> {
    Submitted {
        record: R,
        notification: Notification,
    },
    Failed {
        error: SubmitError,
        notification: Notification,
    },
}

impl<R> SubmitOutcome<R> {
    pub fn notification(&self) -> Notification {
        match self {
            SubmitOutcome::Submitted { notification, .. }
            | SubmitOutcome::Failed { notification, .. } => *notification,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted { .. })
    }
}

pub struct Form<K: FormKind> {
    values: Map<String, Value>,
    errors: BTreeMap<String, String>,
    state: FormState,
    _kind: PhantomData<K>,
}

impl<K: FormKind> Default for Form<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FormKind> Form<K> {
    pub fn new() -> Self {
        Self {
            values: K::defaults(),
            errors: BTreeMap::new(),
            state: FormState::Idle,
            _kind: PhantomData,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Set a field. A field already showing an error is re-checked at once
    /// so the message clears as soon as the input becomes valid.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        let value = value.into();
        if self.errors.contains_key(field) {
            match K::Insert::schema().validate_field(field, &value) {
                Ok(()) => {
                    self.errors.remove(field);
                }
                Err(message) => {
                    self.errors.insert(field.to_string(), message.to_string());
                }
            }
        }
        self.values.insert(field.to_string(), value);
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Current errors in schema field order. Fields the schema does not
    /// know (from a server rejection) follow.
    pub fn field_errors(&self) -> ValidationErrors {
        let schema = K::Insert::schema();
        let known = schema
            .fields
            .iter()
            .filter_map(|rule| self.errors.get_key_value(rule.name));
        let unknown = self
            .errors
            .iter()
            .filter(|(field, _)| schema.field(field).is_none());

        known
            .chain(unknown)
            .map(|(field, message)| FieldError {
                field: field.clone(),
                message: message.clone(),
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// The submit button is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        self.state != FormState::Submitting
    }

    /// Validate the current values and move to `Submitting`, returning the
    /// typed payload to send.
    pub fn begin_submit(&mut self) -> Result<K::Insert, FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::AlreadySubmitting);
        }

        self.state = FormState::Validating;
        match K::Insert::validate(&Value::Object(self.values.clone())) {
            Ok(insert) => {
                self.errors.clear();
                self.state = FormState::Submitting;
                Ok(insert)
            }
            Err(errors) => {
                debug!(fields = errors.len(), "form has invalid fields");
                self.apply_errors(&errors);
                self.state = FormState::Idle;
                Err(FormError::Invalid(errors))
            }
        }
    }

    /// Settle an in-flight submission. Success resets the form; failure
    /// keeps what the user typed and marks any fields the server rejected.
    pub fn finish(&mut self, result: Result<K::Record, SubmitError>) -> SubmitOutcome<K::Record> {
        self.state = FormState::Idle;
        match result {
            Ok(record) => {
                info!("submission accepted");
                self.reset();
                SubmitOutcome::Submitted {
                    record,
                    notification: K::success(),
                }
            }
            Err(error) => {
                warn!(error = %error, "submission failed");
                if let Some(errors) = error.validation_errors() {
                    self.apply_errors(errors);
                }
                SubmitOutcome::Failed {
                    error,
                    notification: K::failure(),
                }
            }
        }
    }

    /// Validate, send one request, and settle. Returns `Err` only when the
    /// form refused to start; server-side outcomes are in the `SubmitOutcome`.
    pub async fn submit(&mut self, client: &IntakeClient) -> Result<SubmitOutcome<K::Record>, FormError> {
        let insert = self.begin_submit()?;
        let result = K::send(client, &insert).await;
        Ok(self.finish(result))
    }

    pub fn reset(&mut self) {
        self.values = K::defaults();
        self.errors.clear();
        self.state = FormState::Idle;
    }

    fn apply_errors(&mut self, errors: &ValidationErrors) {
        self.errors = errors
            .errors()
            .iter()
            .map(|e| (e.field.clone(), e.message.clone()))
            .collect();
    }
}

impl Form<OrderForm> {
    pub fn stepper(&self) -> QuantityStepper {
        QuantityStepper::from_value(self.value("quantity"))
    }

    pub fn increment_quantity(&mut self) {
        let mut stepper = self.stepper();
        stepper.increment();
        self.set("quantity", stepper.value());
    }

    pub fn decrement_quantity(&mut self) {
        let mut stepper = self.stepper();
        stepper.decrement();
        self.set("quantity", stepper.value());
    }

    pub fn input_quantity(&mut self, text: &str) {
        let mut stepper = self.stepper();
        stepper.set_input(text);
        self.set("quantity", stepper.value());
    }

    pub fn price_summary(&self, pricing: &Pricing) -> PriceSummary {
        pricing.summary(self.stepper().value())
    }
}
