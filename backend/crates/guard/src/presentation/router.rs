//! Guard Router

use crate::application::config::GuardConfig;
use crate::presentation::handlers::{self, GuardAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the guard router (CSRF token issuance)
pub fn csrf_router(config: Arc<GuardConfig>) -> Router {
    let state = GuardAppState { config };

    Router::new()
        .route("/csrf", get(handlers::issue_csrf))
        .with_state(state)
}
