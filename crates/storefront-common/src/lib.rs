//! Shared domain types for the storefront intake pipeline.
//!
//! Both the HTTP server and the submission client link this crate, so a
//! payload the client accepts is exactly a payload the server accepts.
//!
//! | Module   | Responsibility                                             |
//! |----------|------------------------------------------------------------|
//! | `models` | `User`, `Complaint`, `Order` and their insert variants     |
//! | `schema` | Declarative field rules, `Validate`, `ValidationErrors`    |

pub mod models;
pub mod schema;

pub use models::{Complaint, InsertComplaint, InsertOrder, InsertUser, Order, User};
pub use schema::{FieldError, Validate, ValidationErrors, ValidationFailureBody};
