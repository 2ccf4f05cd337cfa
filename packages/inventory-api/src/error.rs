//! API error handling.
//!
//! Maps storage `QueryError`s onto HTTP statuses and a JSON error body.
//! Only client errors carry their message to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use inventory_storage::{ErrorKind, QueryError};

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Status code plus error body.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    #[must_use]
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new(code, message))
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::new("REQUEST_CANCELLED", message),
        )
    }

    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", message),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<QueryError> for ApiErrorResponse {
    fn from(error: QueryError) -> Self {
        match error.kind {
            ErrorKind::InvalidParameter => Self::bad_request("INVALID_PARAMETER", error.message),
            ErrorKind::Cancelled => {
                tracing::warn!(%error, "Asset query cancelled");
                Self::unavailable("The request was cancelled before it completed")
            }
            _ => {
                tracing::error!(%error, kind = error.kind.as_str(), "Asset query failed");
                Self::internal_error("An internal error occurred")
            }
        }
    }
}
