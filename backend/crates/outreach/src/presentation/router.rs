//! Outreach Router

use crate::application::config::OutreachConfig;
use crate::infra::resend::{AudienceStore, Mailer, ResendClient};
use crate::presentation::handlers::{self, OutreachAppState};
use axum::{Router, routing::post};
use guard::application::config::GuardConfig;
use guard::application::rate_limiter::RateLimiter;
use std::sync::Arc;

/// Create the outreach router backed by the Resend client
pub fn outreach_router(
    client: ResendClient,
    limiter: Arc<RateLimiter>,
    guard: Arc<GuardConfig>,
    config: OutreachConfig,
) -> Router {
    outreach_router_generic(client, limiter, guard, config)
}

/// Create a generic outreach router for any mail provider implementation
pub fn outreach_router_generic<M>(
    mailer: M,
    limiter: Arc<RateLimiter>,
    guard: Arc<GuardConfig>,
    config: OutreachConfig,
) -> Router
where
    M: Mailer + AudienceStore + Clone + Send + Sync + 'static,
{
    let state = OutreachAppState {
        mailer: Arc::new(mailer),
        limiter,
        guard,
        config: Arc::new(config),
    };

    Router::new()
        .route("/contact", post(handlers::submit_contact::<M>))
        .route("/newsletter", post(handlers::subscribe_newsletter::<M>))
        .route(
            "/newsletter/unsubscribe",
            post(handlers::unsubscribe_newsletter::<M>),
        )
        .with_state(state)
}
