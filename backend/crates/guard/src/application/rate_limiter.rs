//! Rate Limiter Facade
//!
//! One `check(identifier, config)` entry point regardless of backend
//! availability. Constructed once at startup and injected into request
//! handlers; backend selection is re-evaluated on every call, so a
//! distributed failure degrades a single check rather than the process.

use crate::error::{GuardError, GuardResult};
use crate::infra::file_store::FileStore;
use crate::infra::upstash::UpstashStore;
use platform::rate_limit::{RateLimitConfig, RateLimitDecision, RateLimitStore};

/// Dual-backend sliding-window rate limiter
pub struct RateLimiter {
    distributed: Option<UpstashStore>,
    fallback: FileStore,
}

impl RateLimiter {
    /// Create a limiter with an optional distributed backend
    pub fn new(distributed: Option<UpstashStore>, fallback: FileStore) -> Self {
        Self {
            distributed,
            fallback,
        }
    }

    /// Create a limiter that only uses the local file-backed store
    pub fn local_only(fallback: FileStore) -> Self {
        Self::new(None, fallback)
    }

    /// Name of the configured primary backend, for startup logging
    pub fn backend_name(&self) -> &'static str {
        if self.distributed.is_some() {
            "distributed (local fallback)"
        } else {
            "local file"
        }
    }

    /// Check `identifier` against the sliding window described by `config`
    ///
    /// Tries the distributed backend first. Any distributed error is logged
    /// as a warning and the local store answers this call; the next call
    /// re-attempts the distributed path. A local store failure surfaces as
    /// an error instead of silently admitting traffic.
    pub async fn check(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> GuardResult<RateLimitDecision> {
        if let Some(store) = &self.distributed {
            match store.check(identifier, config).await {
                Ok(decision) => return Ok(decision),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        identifier,
                        "Distributed rate limiter unavailable, falling back to local store"
                    );
                }
            }
        }

        self.fallback
            .check(identifier, config)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, identifier, "Local rate limit store failed");
                GuardError::StoreUnavailable(e.to_string())
            })
    }
}
