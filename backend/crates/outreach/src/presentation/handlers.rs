//! HTTP Handlers
//!
//! Every mutating endpoint runs the same gauntlet in order: rate limit,
//! then request authorization (CSRF token or signed link), then honeypot,
//! then the use case. Rejected requests never reach the mail provider.

use crate::application::config::OutreachConfig;
use crate::application::send_contact::{ContactInput, SendContactUseCase};
use crate::application::subscribe::SubscribeUseCase;
use crate::application::unsubscribe::UnsubscribeUseCase;
use crate::error::{OutreachError, OutreachResult};
use crate::infra::resend::{AudienceStore, Mailer};
use crate::presentation::dto::{
    ContactRequest, ContactResponse, NewsletterRequest, NewsletterResponse, UnsubscribeRequest,
    UnsubscribeResponse,
};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use guard::application::config::GuardConfig;
use guard::application::rate_limiter::RateLimiter;
use guard::domain::csrf;
use kernel::id::RequestId;
use platform::client::{extract_client_ip, rate_limit_identifier};
use platform::rate_limit::{RateLimitConfig, RateLimitDecision};
use std::sync::Arc;

const CSRF_HEADER: &str = "x-csrf-token";

/// Shared state for outreach handlers
#[derive(Clone)]
pub struct OutreachAppState<M>
where
    M: Mailer + AudienceStore + Clone + Send + Sync + 'static,
{
    pub mailer: Arc<M>,
    pub limiter: Arc<RateLimiter>,
    pub guard: Arc<GuardConfig>,
    pub config: Arc<OutreachConfig>,
}

impl<M> OutreachAppState<M>
where
    M: Mailer + AudienceStore + Clone + Send + Sync + 'static,
{
    /// Run the sliding-window check for one endpoint
    async fn enforce_rate_limit(
        &self,
        prefix: &str,
        headers: &HeaderMap,
        addr: std::net::SocketAddr,
        config: &RateLimitConfig,
        request_id: &str,
    ) -> OutreachResult<RateLimitDecision> {
        let client_ip = extract_client_ip(headers, Some(addr.ip()));
        let identifier = rate_limit_identifier(prefix, client_ip);

        let decision = self
            .limiter
            .check(&identifier, config)
            .await
            .map_err(|e| OutreachError::Internal {
                request_id: request_id.to_string(),
                detail: format!("rate limiter unavailable: {}", e),
            })?;

        if !decision.allowed {
            return Err(OutreachError::RateLimited {
                limit: decision.limit,
                reset_at_ms: decision.reset_at_ms,
            });
        }

        Ok(decision)
    }

    /// Verify the double-submit CSRF pair (header token, body hash)
    fn enforce_csrf(
        &self,
        headers: &HeaderMap,
        csrf_hash: &str,
        csrf_expires_at: i64,
        request_id: &str,
    ) -> OutreachResult<()> {
        let token = headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !csrf::validate_token(
            token,
            csrf_hash,
            &self.guard.signing_secret,
            Some(csrf_expires_at),
        ) {
            return Err(OutreachError::CsrfValidationFailed {
                request_id: request_id.to_string(),
            });
        }

        Ok(())
    }
}

/// Remaining-budget headers attached to successful responses
fn rate_limit_headers(decision: &RateLimitDecision) -> [(&'static str, String); 3] {
    [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", decision.reset_at_ms.to_string()),
    ]
}

fn honeypot_tripped(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// POST /api/contact
pub async fn submit_contact<M>(
    State(state): State<OutreachAppState<M>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<ContactRequest>,
) -> OutreachResult<Response>
where
    M: Mailer + AudienceStore + Clone + Send + Sync + 'static,
{
    let request_id = RequestId::new().to_string();

    let decision = state
        .enforce_rate_limit(
            "contact",
            &headers,
            addr,
            &state.config.contact_limit,
            &request_id,
        )
        .await?;

    state.enforce_csrf(&headers, &req.csrf_hash, req.csrf_expires_at, &request_id)?;

    // Bots that fill the hidden field get a success they cannot tell apart
    // from the real one; nothing is sent
    if honeypot_tripped(&req.website) {
        tracing::info!(request_id, "Honeypot tripped on contact form");
        let body = ContactResponse {
            success: true,
            request_id,
            id: uuid::Uuid::new_v4().to_string(),
        };
        return Ok((rate_limit_headers(&decision), Json(body)).into_response());
    }

    let use_case = SendContactUseCase::new(state.mailer.clone(), state.config.clone());
    let id = use_case
        .execute(
            ContactInput {
                name: req.name,
                email: req.email,
                subject: req.subject,
                message: req.message,
            },
            &request_id,
        )
        .await?;

    let body = ContactResponse {
        success: true,
        request_id,
        id,
    };
    Ok((rate_limit_headers(&decision), Json(body)).into_response())
}

/// POST /api/newsletter
pub async fn subscribe_newsletter<M>(
    State(state): State<OutreachAppState<M>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<NewsletterRequest>,
) -> OutreachResult<Response>
where
    M: Mailer + AudienceStore + Clone + Send + Sync + 'static,
{
    let request_id = RequestId::new().to_string();

    let decision = state
        .enforce_rate_limit(
            "newsletter",
            &headers,
            addr,
            &state.config.newsletter_limit,
            &request_id,
        )
        .await?;

    state.enforce_csrf(&headers, &req.csrf_hash, req.csrf_expires_at, &request_id)?;

    if honeypot_tripped(&req.honeypot) {
        tracing::info!(request_id, "Honeypot tripped on newsletter form");
        let body = NewsletterResponse {
            success: true,
            request_id,
            id: uuid::Uuid::new_v4().to_string(),
            audience_id: state.config.audience_id.clone(),
        };
        return Ok((rate_limit_headers(&decision), Json(body)).into_response());
    }

    let use_case = SubscribeUseCase::new(
        state.mailer.clone(),
        state.config.clone(),
        state.guard.clone(),
    );
    let output = use_case.execute(&req.email, &request_id).await?;

    let body = NewsletterResponse {
        success: true,
        request_id,
        id: output.contact_id,
        audience_id: output.audience_id,
    };
    Ok((rate_limit_headers(&decision), Json(body)).into_response())
}

/// POST /api/newsletter/unsubscribe
///
/// Authorized by the signed link carried in the body, not a CSRF token;
/// the link arrives from an email client, which never saw our token
/// endpoint.
pub async fn unsubscribe_newsletter<M>(
    State(state): State<OutreachAppState<M>>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<UnsubscribeRequest>,
) -> OutreachResult<Response>
where
    M: Mailer + AudienceStore + Clone + Send + Sync + 'static,
{
    let request_id = RequestId::new().to_string();

    let decision = state
        .enforce_rate_limit(
            "unsub",
            &headers,
            addr,
            &state.config.unsubscribe_limit,
            &request_id,
        )
        .await?;

    let use_case = UnsubscribeUseCase::new(state.mailer.clone(), state.guard.clone());
    let message = use_case
        .execute(&req.email, req.t, &req.sig, &request_id)
        .await?;

    let body = UnsubscribeResponse {
        success: true,
        message,
        request_id,
    };
    Ok((rate_limit_headers(&decision), Json(body)).into_response())
}
