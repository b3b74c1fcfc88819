//! Typed error hierarchy for the storefront.
//!
//! - `StoreError`: record store failures
//! - `SubmitError`: one client round trip to the intake server
//! - `FormError`: a form refusing to start a submission

use storefront_common::ValidationErrors;
use thiserror::Error;

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username '{username}' is already taken")]
    UsernameTaken { username: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from submitting a payload to the intake server.
///
/// `Rejected` is the only recoverable outcome: the caller fixes the listed
/// fields and resubmits. Everything else is a fault.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Submission rejected: {0}")]
    Rejected(#[source] ValidationErrors),

    #[error("Server responded with status {status}")]
    Fault { status: u16 },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SubmitError {
    pub fn is_fault(&self) -> bool {
        !matches!(self, SubmitError::Rejected(_))
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            SubmitError::Rejected(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Errors raised by a form before any request is sent.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Form has invalid fields: {0}")]
    Invalid(#[source] ValidationErrors),
}
