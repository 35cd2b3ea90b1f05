//! Endpoint tests for the outreach router
//!
//! Runs the real router against an in-memory mail provider and a
//! file-backed rate limiter in a temp directory.

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use guard::application::config::GuardConfig;
use guard::application::rate_limiter::RateLimiter;
use guard::domain::csrf;
use guard::infra::file_store::FileStore;
use http_body_util::BodyExt;
use outreach::application::config::OutreachConfig;
use outreach::infra::resend::{
    AudienceStore, MailError, Mailer, OutboundEmail, RemoveOutcome,
};
use outreach::presentation::router::outreach_router_generic;
use platform::crypto;
use platform::rate_limit::RateLimitConfig;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const SECRET: &str = "endpoint-test-secret-0123456789abcdef";

#[derive(Default)]
struct MockInner {
    sent: Vec<OutboundEmail>,
    added: Vec<String>,
    removed: Vec<String>,
    contact_missing: bool,
}

/// In-memory stand-in for the mail provider
#[derive(Clone, Default)]
struct MockProvider {
    inner: Arc<Mutex<MockInner>>,
}

impl Mailer for MockProvider {
    async fn send(&self, email: &OutboundEmail) -> Result<String, MailError> {
        let mut inner = self.inner.lock().unwrap();
        inner.sent.push(email.clone());
        Ok(format!("email-{}", inner.sent.len()))
    }
}

impl AudienceStore for MockProvider {
    async fn add_contact(&self, email: &str) -> Result<String, MailError> {
        let mut inner = self.inner.lock().unwrap();
        inner.added.push(email.to_string());
        Ok(format!("contact-{}", inner.added.len()))
    }

    async fn remove_contact(&self, email: &str) -> Result<RemoveOutcome, MailError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.contact_missing {
            return Ok(RemoveOutcome::NotFound);
        }
        inner.removed.push(email.to_string());
        Ok(RemoveOutcome::Removed)
    }
}

fn test_app(provider: MockProvider, config: OutreachConfig, dir: &tempfile::TempDir) -> Router {
    let guard_config = Arc::new(GuardConfig::with_secret(SECRET));
    let limiter = Arc::new(RateLimiter::local_only(FileStore::new(
        dir.path().join("windows.json"),
    )));

    Router::new()
        .nest(
            "/api",
            outreach_router_generic(provider, limiter, guard_config, config),
        )
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
}

async fn post_json(app: &Router, path: &str, csrf_token: Option<&str>, body: Value) -> (StatusCode, Value, axum::http::HeaderMap) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = csrf_token {
        builder = builder.header("x-csrf-token", token);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body, headers)
}

fn contact_body(token: &csrf::CsrfToken) -> Value {
    json!({
        "name": "Jordan",
        "email": "Jordan@Example.com",
        "subject": "Collaboration",
        "message": "Hello there",
        "csrfHash": token.hash,
        "csrfExpiresAt": token.expires_at_ms,
    })
}

#[tokio::test]
async fn test_contact_happy_path() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    let (status, body, headers) =
        post_json(&app, "/api/contact", Some(&token.token), contact_body(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["id"], json!("email-1"));
    assert!(body["requestId"].is_string());
    assert_eq!(headers["x-ratelimit-limit"], "5");
    assert_eq!(headers["x-ratelimit-remaining"], "4");

    let inner = provider.inner.lock().unwrap();
    assert_eq!(inner.sent.len(), 2, "notification plus auto-reply");
    assert_eq!(inner.sent[0].subject, "[Contact] Collaboration");
    // The submitter's email is normalized before composing
    assert_eq!(inner.sent[0].reply_to.as_deref(), Some("jordan@example.com"));
    assert_eq!(inner.sent[1].to, "jordan@example.com");
}

#[tokio::test]
async fn test_contact_rejects_missing_csrf_token() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    let (status, body, _) = post_json(&app, "/api/contact", None, contact_body(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("CSRF_VALIDATION_FAILED"));
    assert!(provider.inner.lock().unwrap().sent.is_empty());
}

#[tokio::test]
async fn test_contact_rejects_expired_csrf_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockProvider::default(), OutreachConfig::development(), &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    let mut body = contact_body(&token);
    body["csrfExpiresAt"] = json!(Utc::now().timestamp_millis() - 1_000);

    let (status, body, _) = post_json(&app, "/api/contact", Some(&token.token), body).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("CSRF_VALIDATION_FAILED"));
}

#[tokio::test]
async fn test_contact_rejects_invalid_field() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    let mut body = contact_body(&token);
    body["name"] = json!("   ");

    let (status, body, _) = post_json(&app, "/api/contact", Some(&token.token), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Name"));
    assert!(provider.inner.lock().unwrap().sent.is_empty());
}

#[tokio::test]
async fn test_contact_honeypot_gets_silent_success() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    let mut body = contact_body(&token);
    body["website"] = json!("http://spam.example");

    let (status, body, _) = post_json(&app, "/api/contact", Some(&token.token), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["id"].is_string());
    assert!(provider.inner.lock().unwrap().sent.is_empty(), "nothing sent");
}

#[tokio::test]
async fn test_newsletter_happy_path_sends_welcome_with_signed_link() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    let body = json!({
        "email": "reader@example.com",
        "csrfHash": token.hash,
        "csrfExpiresAt": token.expires_at_ms,
    });

    let (status, body, _) = post_json(&app, "/api/newsletter", Some(&token.token), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["id"], json!("contact-1"));

    let inner = provider.inner.lock().unwrap();
    assert_eq!(inner.added, vec!["reader@example.com"]);
    assert_eq!(inner.sent.len(), 1);
    let welcome = &inner.sent[0];
    assert_eq!(welcome.to, "reader@example.com");
    assert!(welcome.text.contains("/unsubscribe?"));
    assert!(welcome.text.contains("sig="));
}

#[tokio::test]
async fn test_newsletter_honeypot_gets_silent_success() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    let body = json!({
        "email": "bot@example.com",
        "honeypot": "filled by a bot",
        "csrfHash": token.hash,
        "csrfExpiresAt": token.expires_at_ms,
    });

    let (status, body, _) = post_json(&app, "/api/newsletter", Some(&token.token), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let inner = provider.inner.lock().unwrap();
    assert!(inner.added.is_empty());
    assert!(inner.sent.is_empty());
}

#[tokio::test]
async fn test_newsletter_rate_limit_returns_429_with_retry_guidance() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let config = OutreachConfig {
        newsletter_limit: RateLimitConfig::new(2, 600),
        ..OutreachConfig::development()
    };
    let app = test_app(provider.clone(), config, &dir);

    let token = csrf::issue_token(SECRET, 15 * 60 * 1000);
    // Honeypot submissions still consume budget, and keep the provider quiet
    let body = json!({
        "email": "bot@example.com",
        "honeypot": "x",
        "csrfHash": token.hash,
        "csrfExpiresAt": token.expires_at_ms,
    });

    for _ in 0..2 {
        let (status, _, _) =
            post_json(&app, "/api/newsletter", Some(&token.token), body.clone()).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body, headers) =
        post_json(&app, "/api/newsletter", Some(&token.token), body).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(headers["x-ratelimit-limit"], "2");
    assert_eq!(headers["x-ratelimit-remaining"], "0");
    assert!(headers.contains_key("x-ratelimit-reset"));
    let retry_after: i64 = headers["retry-after"].to_str().unwrap().parse().unwrap();
    assert!(retry_after > 0 && retry_after <= 600);
    assert!(body["retryAfter"].is_number());
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Too many requests")
    );
}

#[tokio::test]
async fn test_unsubscribe_happy_path_and_idempotent_repeat() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let email = "reader@example.com";
    let t = Utc::now().timestamp_millis();
    let sig = crypto::sign(&format!("{}:{}", email, t), SECRET);
    let body = json!({ "email": email, "t": t, "sig": sig });

    let (status, response, _) =
        post_json(&app, "/api/newsletter/unsubscribe", None, body.clone()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], json!(true));
    assert_eq!(response["message"], json!("You have been unsubscribed."));
    assert_eq!(provider.inner.lock().unwrap().removed, vec![email]);

    // A second click on the same link finds no contact but still succeeds
    provider.inner.lock().unwrap().contact_missing = true;
    let (status, response, _) = post_json(&app, "/api/newsletter/unsubscribe", None, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], json!(true));
}

#[tokio::test]
async fn test_unsubscribe_rejects_wrong_secret_signature() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::default();
    let app = test_app(provider.clone(), OutreachConfig::development(), &dir);

    let email = "reader@example.com";
    let t = Utc::now().timestamp_millis();
    let sig = crypto::sign(&format!("{}:{}", email, t), "another-secret-another-secret-12");
    let body = json!({ "email": email, "t": t, "sig": sig });

    let (status, response, _) = post_json(&app, "/api/newsletter/unsubscribe", None, body).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(response["error"].as_str().unwrap().contains("signature"));
    assert!(provider.inner.lock().unwrap().removed.is_empty());
}

#[tokio::test]
async fn test_unsubscribe_rejects_missing_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockProvider::default(), OutreachConfig::development(), &dir);

    let (status, response, _) =
        post_json(&app, "/api/newsletter/unsubscribe", None, json!({})).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(
        response["error"]
            .as_str()
            .unwrap()
            .contains("missing required parameters")
    );
}

#[tokio::test]
async fn test_unsubscribe_rejects_expired_link() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(MockProvider::default(), OutreachConfig::development(), &dir);

    let email = "reader@example.com";
    let t = Utc::now().timestamp_millis() - 8 * 24 * 60 * 60 * 1000;
    let sig = crypto::sign(&format!("{}:{}", email, t), SECRET);
    let body = json!({ "email": email, "t": t, "sig": sig });

    let (status, response, _) = post_json(&app, "/api/newsletter/unsubscribe", None, body).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(response["error"].as_str().unwrap().contains("expired"));
}
