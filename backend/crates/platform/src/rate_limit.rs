//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions shared by all limiter backends.

use std::time::Duration;

/// Boxed error type returned by rate limit stores
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
///
/// Invariants: `remaining <= limit`, and a denied decision always carries
/// `remaining == 0`.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitDecision {
    /// Decision for an admitted request
    pub fn admitted(limit: u32, remaining: u32, reset_at_ms: i64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: remaining.min(limit),
            reset_at_ms,
        }
    }

    /// Decision for a denied request
    pub fn denied(limit: u32, reset_at_ms: i64) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_at_ms,
        }
    }

    /// Seconds until the window resets, rounded up, never negative
    pub fn retry_after_secs(&self, now_ms: i64) -> i64 {
        ((self.reset_at_ms - now_ms).max(0) + 999) / 1000
    }
}

/// Trait for rate limit storage backends
///
/// A request at time `t` is counted against the sliding window
/// `[t - window, t]`; only admitted requests consume window budget.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check the sliding window for `identifier` and, if under the limit,
    /// record the request.
    async fn check(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitDecision, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_window_ms() {
        let config = RateLimitConfig::new(3, 60);
        assert_eq!(config.window_ms(), 60_000);
        assert_eq!(config.max_requests, 3);
    }

    #[test]
    fn test_decision_invariants() {
        let denied = RateLimitDecision::denied(5, 1_000);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);

        let admitted = RateLimitDecision::admitted(5, 9, 1_000);
        assert!(admitted.remaining <= admitted.limit);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let decision = RateLimitDecision::denied(5, 10_500);
        assert_eq!(decision.retry_after_secs(10_000), 1);
        assert_eq!(decision.retry_after_secs(9_000), 2);
        assert_eq!(decision.retry_after_secs(11_000), 0);
    }
}
