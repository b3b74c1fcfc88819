use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use storefront_common::{
    InsertComplaint, InsertOrder, Validate, ValidationErrors, ValidationFailureBody,
};
use tracing::{debug, error, info};

use super::store::{MemStorage, Storage};
use crate::errors::StoreError;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> SharedState {
        Arc::new(Self { storage })
    }

    /// State backed by a fresh, empty `MemStorage`.
    pub fn in_memory() -> SharedState {
        Self::new(Arc::new(MemStorage::new()))
    }
}

// ── Error handling ────────────────────────────────────────────────────

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

pub enum ApiError {
    Validation(ValidationErrors),
    BadRequest(String),
    /// Detail is logged, never sent to the caller.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationFailureBody::from(errors)),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"message": message})),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"message": INTERNAL_ERROR_MESSAGE})),
                )
                    .into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/api/complaints", post(create_complaint))
        .route("/api/orders", post(create_order))
        .route("/health", get(health_check))
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Re-validate an untrusted body against the insert schema for `T`.
fn validate_payload<T: Validate>(payload: Result<Json<Value>, JsonRejection>) -> Result<T, ApiError> {
    let Json(raw) = payload?;
    T::validate(&raw).map_err(|errors| {
        debug!(
            record = T::schema().record,
            fields = errors.len(),
            "payload rejected"
        );
        ApiError::Validation(errors)
    })
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn create_complaint(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let insert: InsertComplaint = validate_payload(payload)?;
    let complaint = state.storage.create_complaint(insert).await?;
    info!(id = %complaint.id, "complaint created");
    Ok((StatusCode::CREATED, Json(complaint)))
}

async fn create_order(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let insert: InsertOrder = validate_payload(payload)?;
    let order = state.storage.create_order(insert).await?;
    info!(id = %order.id, quantity = order.quantity, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}
