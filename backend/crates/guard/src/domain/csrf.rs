//! CSRF Token Service
//!
//! Issues short-lived tokens bound to an HMAC hash and validates
//! token/hash/expiry triples echoed back by form clients.
//!
//! Tokens are stateless: nothing is stored server-side and a token is not
//! consumed by validation, so replay inside the 15-minute window is an
//! accepted tradeoff. The token travels in a request header while the hash
//! travels in the body; an attacker replaying one without the other fails
//! validation.

use chrono::Utc;
use platform::crypto;

/// Entropy of the token value in bytes
pub const CSRF_TOKEN_BYTES: usize = 32;

/// An issued CSRF token (never persisted server-side)
#[derive(Debug, Clone)]
pub struct CsrfToken {
    /// Opaque random value, URL-safe encoded
    pub token: String,
    /// HMAC-SHA256 of the token, URL-safe encoded
    pub hash: String,
    /// Fixed at issuance, never extended
    pub expires_at_ms: i64,
}

/// Issue a new CSRF token valid for `ttl_ms`
pub fn issue_token(secret: &str, ttl_ms: i64) -> CsrfToken {
    let token = crypto::random_token(CSRF_TOKEN_BYTES);
    let hash = crypto::sign(&token, secret);
    CsrfToken {
        token,
        hash,
        expires_at_ms: Utc::now().timestamp_millis() + ttl_ms,
    }
}

/// Validate a token/hash pair submitted by a client
///
/// Returns `false` on any empty input, on expiry (when `expires_at_ms` is
/// supplied), or on hash mismatch. Never panics.
pub fn validate_token(
    token: &str,
    expected_hash: &str,
    secret: &str,
    expires_at_ms: Option<i64>,
) -> bool {
    validate_token_at(
        token,
        expected_hash,
        secret,
        expires_at_ms,
        Utc::now().timestamp_millis(),
    )
}

/// Clock-injected variant of [`validate_token`]
pub fn validate_token_at(
    token: &str,
    expected_hash: &str,
    secret: &str,
    expires_at_ms: Option<i64>,
    now_ms: i64,
) -> bool {
    if token.is_empty() || expected_hash.is_empty() || secret.is_empty() {
        return false;
    }
    if let Some(expires_at) = expires_at_ms {
        if now_ms > expires_at {
            return false;
        }
    }
    crypto::verify(token, expected_hash, secret)
}
