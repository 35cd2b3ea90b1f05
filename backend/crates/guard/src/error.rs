//! Guard Error Types
//!
//! This module provides guard-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde_json::json;
use thiserror::Error;

/// Guard-specific result type alias
pub type GuardResult<T> = Result<T, GuardError>;

/// Guard-specific error variants
#[derive(Debug, Error)]
pub enum GuardError {
    /// Configuration is unusable (bad base URL, weak secret, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Both rate limit backends failed for a check
    #[error("Rate limit store unavailable: {0}")]
    StoreUnavailable(String),
}

impl GuardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GuardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GuardError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuardError::Config(_) => ErrorKind::InternalServerError,
            GuardError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
        }
    }
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Guard error");
        let status = self.status_code();
        // Generic body; internals stay in the logs
        let body = Json(json!({ "error": "Internal server error" }));
        (status, body).into_response()
    }
}
