use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use storefront_common::{
    Complaint, InsertComplaint, InsertOrder, Order, ValidationErrors, ValidationFailureBody,
};
use tracing::debug;

use crate::errors::SubmitError;

/// HTTP client for the intake endpoints.
///
/// Each call is a single round trip with no retry. The outcome is the
/// created record, a field-level rejection, or a fault.
#[derive(Debug, Clone)]
pub struct IntakeClient {
    http: reqwest::Client,
    base_url: String,
}

impl IntakeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn submit_complaint(&self, complaint: &InsertComplaint) -> Result<Complaint, SubmitError> {
        self.post("/api/complaints", complaint).await
    }

    pub async fn submit_order(&self, order: &InsertOrder) -> Result<Order, SubmitError> {
        self.post("/api/orders", order).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, SubmitError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "submitting");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<R>().await?);
        }

        if status == StatusCode::BAD_REQUEST {
            // Malformed-body rejections carry no field list and count as faults.
            if let Ok(body) = response.json::<ValidationFailureBody>().await
                && !body.errors.is_empty()
            {
                return Err(SubmitError::Rejected(ValidationErrors::from(body.errors)));
            }
        }

        Err(SubmitError::Fault {
            status: status.as_u16(),
        })
    }
}
