//! Client side of the intake pipeline: the HTTP client, the form state
//! machine that drives it, and the order form's quantity and price helpers.

pub mod form;
pub mod http;
pub mod notify;
pub mod stepper;

pub use form::{ComplaintForm, Form, FormKind, FormState, OrderForm, SubmitOutcome};
pub use http::IntakeClient;
pub use notify::{Notification, Variant};
pub use stepper::{Money, PriceSummary, Pricing, QuantityStepper};
