//! HTTP Handlers

use crate::application::config::GuardConfig;
use crate::domain::csrf;
use crate::presentation::dto::CsrfResponse;
use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;

/// Shared state for guard handlers
#[derive(Clone)]
pub struct GuardAppState {
    pub config: Arc<GuardConfig>,
}

/// GET /api/csrf
///
/// Issues a fresh token per request; responses must never be cached or a
/// proxy could hand the same token to multiple clients.
pub async fn issue_csrf(State(state): State<GuardAppState>) -> impl IntoResponse {
    let token = csrf::issue_token(&state.config.signing_secret, state.config.csrf_ttl_ms());

    tracing::debug!(expires_at_ms = token.expires_at_ms, "Issued CSRF token");

    (
        [
            (
                header::CACHE_CONTROL,
                "no-store, no-cache, must-revalidate",
            ),
            (header::PRAGMA, "no-cache"),
        ],
        Json(CsrfResponse {
            token: token.token,
            hash: token.hash,
            expires_at: token.expires_at_ms,
        }),
    )
}
