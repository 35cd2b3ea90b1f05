//! Outreach Error Types
//!
//! Maps every failure the endpoints can produce to the response contract:
//! 400 for schema validation, 403 for CSRF/signed-link failures, 429 with
//! retry guidance for rate limiting, 500 with a request ID for downstream
//! send failures. Bodies are generic; internals stay in the logs.

use crate::infra::resend::MailError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use guard::domain::signed_link::LinkError;
use kernel::error::app_error::AppError;
use serde_json::json;
use thiserror::Error;

/// Outreach-specific result type alias
pub type OutreachResult<T> = Result<T, OutreachError>;

/// Outreach-specific error variants
#[derive(Debug, Error)]
pub enum OutreachError {
    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited { limit: u32, reset_at_ms: i64 },

    /// CSRF token missing, expired, or mismatched
    #[error("Invalid or missing CSRF token")]
    CsrfValidationFailed { request_id: String },

    /// Signed unsubscribe link failed validation
    #[error("Invalid unsubscribe link: {reason}")]
    InvalidLink {
        reason: LinkError,
        request_id: String,
    },

    /// Request body failed schema validation
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        request_id: String,
    },

    /// Mail provider rejected or timed out on the primary send
    #[error("Email send failed")]
    SendFailed {
        request_id: String,
        #[source]
        source: MailError,
    },

    /// Internal error
    #[error("Internal error: {detail}")]
    Internal {
        request_id: String,
        detail: String,
    },
}

impl OutreachError {
    /// Map a kernel validation error, hiding field detail in production
    pub fn validation_from(err: AppError, request_id: &str, expose_detail: bool) -> Self {
        let message = if expose_detail {
            err.message().to_string()
        } else {
            "Invalid request".to_string()
        };
        OutreachError::Validation {
            message,
            request_id: request_id.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OutreachError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            OutreachError::CsrfValidationFailed { .. } | OutreachError::InvalidLink { .. } => {
                StatusCode::FORBIDDEN
            }
            OutreachError::Validation { .. } => StatusCode::BAD_REQUEST,
            OutreachError::SendFailed { .. } | OutreachError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            OutreachError::SendFailed { request_id, source } => {
                tracing::error!(request_id, error = %source, "Email send failed");
            }
            OutreachError::Internal { request_id, detail } => {
                tracing::error!(request_id, detail, "Outreach internal error");
            }
            OutreachError::RateLimited { limit, .. } => {
                tracing::warn!(limit, "Rate limit exceeded");
            }
            OutreachError::CsrfValidationFailed { request_id } => {
                tracing::warn!(request_id, "CSRF validation failed");
            }
            _ => {
                tracing::debug!(error = %self, "Outreach request rejected");
            }
        }
    }
}

impl IntoResponse for OutreachError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();

        match self {
            OutreachError::RateLimited { limit, reset_at_ms } => {
                let retry_after = platform::rate_limit::RateLimitDecision::denied(limit, reset_at_ms)
                    .retry_after_secs(Utc::now().timestamp_millis());
                let headers = [
                    ("x-ratelimit-limit", limit.to_string()),
                    ("x-ratelimit-remaining", "0".to_string()),
                    ("x-ratelimit-reset", reset_at_ms.to_string()),
                    ("retry-after", retry_after.to_string()),
                ];
                let body = Json(json!({
                    "error": "Too many requests. Please try again later.",
                    "retryAfter": retry_after,
                }));
                (status, headers, body).into_response()
            }
            OutreachError::CsrfValidationFailed { request_id } => {
                let body = Json(json!({
                    "error": "Invalid or missing CSRF token",
                    "code": "CSRF_VALIDATION_FAILED",
                    "requestId": request_id,
                }));
                (status, body).into_response()
            }
            OutreachError::InvalidLink { reason, request_id } => {
                let body = Json(json!({
                    "error": reason.to_string(),
                    "requestId": request_id,
                }));
                (status, body).into_response()
            }
            OutreachError::Validation { message, request_id } => {
                let body = Json(json!({
                    "error": message,
                    "requestId": request_id,
                }));
                (status, body).into_response()
            }
            OutreachError::SendFailed { request_id, .. } => {
                let body = Json(json!({
                    "error": "Failed to send message. Please try again later.",
                    "requestId": request_id,
                }));
                (status, body).into_response()
            }
            OutreachError::Internal { request_id, .. } => {
                let body = Json(json!({
                    "error": "Internal server error",
                    "requestId": request_id,
                }));
                (status, body).into_response()
            }
        }
    }
}
