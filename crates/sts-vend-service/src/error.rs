//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sts_vend_core::VendError;
use sts_vend_store::StoreError;

use crate::sts::StsError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - missing fields or an unusable amount.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The client already vended today.
    #[error("daily vending limit reached")]
    DailyLimitExceeded,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Every STS credential failed. Safely retryable: no token was issued
    /// and nothing was recorded.
    #[error("issuer exhausted: {0}")]
    IssuerExhausted(String),

    /// Internal server error (storage and the like).
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::DailyLimitExceeded => {
                (StatusCode::FORBIDDEN, "Daily vending limit reached.".into())
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::IssuerExhausted(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".into(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<VendError> for ApiError {
    fn from(err: VendError) -> Self {
        match err {
            VendError::InvalidInput(msg) | VendError::InvalidAmount(msg) => Self::BadRequest(msg),
            VendError::DailyLimitExceeded => Self::DailyLimitExceeded,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // Another same-day vend won the conditional write; to the caller
            // this is the daily limit.
            StoreError::VendDateConflict { .. } => Self::DailyLimitExceeded,
            StoreError::NotFound => Self::Internal("record vanished mid-request".into()),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<StsError> for ApiError {
    fn from(err: StsError) -> Self {
        match err {
            StsError::Exhausted { message } => Self::IssuerExhausted(message),
        }
    }
}
