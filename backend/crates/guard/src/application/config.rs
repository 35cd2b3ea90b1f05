//! Application Configuration
//!
//! Configuration for the guard application layer.

use crate::error::{GuardError, GuardResult};
use std::time::Duration;

/// Development-only signing secret. Never used when APP_ENV=production;
/// production startup fails without an explicit secret.
pub const DEV_SIGNING_SECRET: &str = "dev-only-signing-secret-not-for-production-use";

/// Minimum signing secret length accepted in production
pub const MIN_SECRET_LEN: usize = 32;

/// Guard configuration
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Process-wide signing secret for CSRF tokens and signed links
    pub signing_secret: String,
    /// CSRF token lifetime
    pub csrf_ttl: Duration,
    /// Signed unsubscribe link lifetime
    pub unsubscribe_ttl: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            csrf_ttl: Duration::from_secs(15 * 60),
            unsubscribe_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl GuardConfig {
    /// Create config with an explicit signing secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            signing_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create config for development (fixed, clearly-labeled secret)
    pub fn development() -> Self {
        Self::with_secret(DEV_SIGNING_SECRET)
    }

    /// Validate this config for a production deployment
    pub fn validate_production(&self) -> GuardResult<()> {
        if self.signing_secret.len() < MIN_SECRET_LEN {
            return Err(GuardError::Config(format!(
                "signing secret must be at least {} characters in production",
                MIN_SECRET_LEN
            )));
        }
        if self.signing_secret == DEV_SIGNING_SECRET {
            return Err(GuardError::Config(
                "development signing secret must not be used in production".to_string(),
            ));
        }
        Ok(())
    }

    pub fn csrf_ttl_ms(&self) -> i64 {
        self.csrf_ttl.as_millis() as i64
    }

    pub fn unsubscribe_ttl_ms(&self) -> i64 {
        self.unsubscribe_ttl.as_millis() as i64
    }
}
