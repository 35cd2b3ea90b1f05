//! Mail provider client (Resend HTTP API)
//!
//! The rest of the crate only needs "send an email, get an id or an error"
//! and "add/remove an audience contact"; the traits here are that boundary.
//! Removing a contact the provider does not know is a success, which keeps
//! the unsubscribe endpoint idempotent for stale links.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Outbound send timeout; a provider that has not answered by then is
/// treated as failed, not retried
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// An email ready to hand to the provider
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Mail provider error
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider returned {status}: {body}")]
    Provider { status: u16, body: String },
}

/// Outcome of removing an audience contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Trait for the outbound email transport
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Send an email, returning the provider's message id
    async fn send(&self, email: &OutboundEmail) -> Result<String, MailError>;
}

/// Trait for the newsletter audience store
#[trait_variant::make(AudienceStore: Send)]
pub trait LocalAudienceStore {
    /// Add a contact, returning the provider's contact id
    async fn add_contact(&self, email: &str) -> Result<String, MailError>;

    /// Remove a contact; a contact the provider never had is `NotFound`,
    /// not an error
    async fn remove_contact(&self, email: &str) -> Result<RemoveOutcome, MailError>;
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

/// Resend HTTP API client
#[derive(Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    audience_id: String,
}

impl ResendClient {
    pub fn new(api_key: impl Into<String>, audience_id: impl Into<String>) -> Self {
        Self::with_base_url("https://api.resend.com", api_key, audience_id)
    }

    /// Override the API endpoint (used by tests against a stub server)
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        audience_id: impl Into<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("reqwest client construction only fails on TLS misconfiguration");
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            audience_id: audience_id.into(),
        }
    }

    async fn provider_error(response: reqwest::Response) -> MailError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        MailError::Provider { status, body }
    }
}

impl Mailer for ResendClient {
    async fn send(&self, email: &OutboundEmail) -> Result<String, MailError> {
        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let body = response.json::<IdResponse>().await?;
        Ok(body.id)
    }
}

impl AudienceStore for ResendClient {
    async fn add_contact(&self, email: &str) -> Result<String, MailError> {
        let response = self
            .http
            .post(format!(
                "{}/audiences/{}/contacts",
                self.base_url, self.audience_id
            ))
            .bearer_auth(&self.api_key)
            .json(&json!({ "email": email, "unsubscribed": false }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let body = response.json::<IdResponse>().await?;
        Ok(body.id)
    }

    async fn remove_contact(&self, email: &str) -> Result<RemoveOutcome, MailError> {
        let response = self
            .http
            .delete(format!(
                "{}/audiences/{}/contacts/{}",
                self.base_url, self.audience_id, email
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(RemoveOutcome::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        Ok(RemoveOutcome::Removed)
    }
}
