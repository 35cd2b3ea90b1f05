//! Signed-Link Service
//!
//! Builds and validates long-lived, tamper-evident unsubscribe URLs.
//! A link carries the email, an issuance timestamp (`t`, epoch ms) and an
//! HMAC signature (`sig`) over `"<email>:<t>"`. There is no revocation
//! list: validity is wholly a function of signature plus elapsed time, and
//! the downstream "remove from audience" step is idempotent for stale links.

use chrono::Utc;
use platform::crypto;
use thiserror::Error;
use url::Url;

/// Why a link failed validation
///
/// Ordering of checks matters for user-facing messaging: missing inputs are
/// reported before expiry, expiry before a future timestamp, and the
/// signature is only checked last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("missing required parameters")]
    MissingParameters,
    #[error("link expired")]
    Expired,
    #[error("invalid timestamp")]
    InvalidTimestamp,
    #[error("invalid signature")]
    InvalidSignature,
}

/// Signing payload for an unsubscribe link
fn link_payload(email: &str, issued_at_ms: i64) -> String {
    format!("{}:{}", email, issued_at_ms)
}

/// Build a signed unsubscribe URL under `<base_url>/unsubscribe`
pub fn generate_unsubscribe_url(
    email: &str,
    base_url: &str,
    secret: &str,
) -> Result<String, url::ParseError> {
    generate_unsubscribe_url_at(email, base_url, secret, Utc::now().timestamp_millis())
}

/// Clock-injected variant of [`generate_unsubscribe_url`]
pub fn generate_unsubscribe_url_at(
    email: &str,
    base_url: &str,
    secret: &str,
    issued_at_ms: i64,
) -> Result<String, url::ParseError> {
    let signature = crypto::sign(&link_payload(email, issued_at_ms), secret);
    let mut url = Url::parse(&format!("{}/unsubscribe", base_url.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("email", email)
        .append_pair("t", &issued_at_ms.to_string())
        .append_pair("sig", &signature);
    Ok(url.into())
}

/// Validate an unsubscribe link's parameters
///
/// `issued_at_ms` is `None` when the client omitted `t`. A future-dated
/// timestamp is rejected so a forged `t` cannot extend the effective
/// lifetime (and it catches clock skew).
pub fn validate_unsubscribe_link(
    email: &str,
    issued_at_ms: Option<i64>,
    signature: &str,
    secret: &str,
    max_age_ms: i64,
) -> Result<(), LinkError> {
    validate_unsubscribe_link_at(
        email,
        issued_at_ms,
        signature,
        secret,
        max_age_ms,
        Utc::now().timestamp_millis(),
    )
}

/// Clock-injected variant of [`validate_unsubscribe_link`]
pub fn validate_unsubscribe_link_at(
    email: &str,
    issued_at_ms: Option<i64>,
    signature: &str,
    secret: &str,
    max_age_ms: i64,
    now_ms: i64,
) -> Result<(), LinkError> {
    let issued_at_ms = match issued_at_ms {
        Some(t) if !email.is_empty() && !signature.is_empty() => t,
        _ => return Err(LinkError::MissingParameters),
    };

    if now_ms - issued_at_ms > max_age_ms {
        return Err(LinkError::Expired);
    }
    if now_ms < issued_at_ms {
        return Err(LinkError::InvalidTimestamp);
    }
    if !crypto::verify(&link_payload(email, issued_at_ms), signature, secret) {
        return Err(LinkError::InvalidSignature);
    }
    Ok(())
}
