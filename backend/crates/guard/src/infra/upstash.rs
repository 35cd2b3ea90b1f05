//! Distributed sliding-window limiter over the Upstash Redis REST API
//!
//! One `EVAL` round trip per check keeps the window atomic on the Redis
//! side: expired members are pruned from a sorted set, the remaining count
//! is compared against the limit, and only an admitted request is added.
//! Rejected attempts therefore do not consume window budget, matching the
//! local file store's semantics.

use chrono::Utc;
use platform::crypto::random_token;
use platform::rate_limit::{RateLimitConfig, RateLimitDecision, StoreError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Sliding-window check as a single atomic script.
/// Returns `{allowed, remaining, reset_at_ms}`.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local max = tonumber(ARGV[3])
local member = ARGV[4]
redis.call('ZREMRANGEBYSCORE', key, 0, now - window)
local count = redis.call('ZCARD', key)
local allowed = 0
local remaining = 0
if count < max then
  redis.call('ZADD', key, now, member)
  redis.call('PEXPIRE', key, window)
  allowed = 1
  remaining = max - count - 1
end
local reset = now + window
local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
if oldest[2] then
  reset = tonumber(oldest[2]) + window
end
return {allowed, remaining, reset}
"#;

/// Round-trip timeout for the REST call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct UpstashResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Upstash REST client for the distributed limiter
///
/// The client is constructed once at startup and reused across calls; the
/// facade decides per call whether a failed round trip falls back locally.
pub struct UpstashStore {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl UpstashStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn eval_window(
        &self,
        key: &str,
        now_ms: i64,
        config: &RateLimitConfig,
    ) -> Result<Vec<i64>, StoreError> {
        // Member value must be unique per admitted request
        let member = format!("{}-{}", now_ms, random_token(8));
        let command = json!([
            "EVAL",
            SLIDING_WINDOW_SCRIPT,
            "1",
            key,
            now_ms.to_string(),
            config.window_ms().to_string(),
            config.max_requests.to_string(),
            member,
        ]);

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?
            .error_for_status()?
            .json::<UpstashResponse>()
            .await?;

        if let Some(error) = response.error {
            return Err(format!("upstash error: {}", error).into());
        }

        let result = response
            .result
            .ok_or("upstash response missing result field")?;
        let values = result
            .as_array()
            .ok_or("upstash EVAL result is not an array")?;
        if values.len() != 3 {
            return Err("upstash EVAL result has unexpected arity".into());
        }

        values.iter().map(value_as_i64).collect()
    }
}

/// Redis replies can surface integers as numbers or bulk strings
fn value_as_i64(value: &Value) -> Result<i64, StoreError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| "non-integer number in upstash reply".into()),
        Value::String(s) => Ok(s.parse::<i64>()?),
        other => Err(format!("unexpected value in upstash reply: {}", other).into()),
    }
}

impl platform::rate_limit::RateLimitStore for UpstashStore {
    async fn check(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitDecision, StoreError> {
        let now_ms = Utc::now().timestamp_millis();
        let key = format!("ratelimit:{}", identifier);
        let reply = self.eval_window(&key, now_ms, config).await?;

        let (allowed, remaining, reset_at_ms) = (reply[0] == 1, reply[1], reply[2]);
        tracing::debug!(identifier, allowed, remaining, "Distributed rate limit check");

        if allowed {
            Ok(RateLimitDecision::admitted(
                config.max_requests,
                remaining.max(0) as u32,
                reset_at_ms,
            ))
        } else {
            Ok(RateLimitDecision::denied(config.max_requests, reset_at_ms))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_as_i64_accepts_numbers_and_strings() {
        assert_eq!(value_as_i64(&json!(42)).unwrap(), 42);
        assert_eq!(value_as_i64(&json!("1700000000000")).unwrap(), 1_700_000_000_000);
        assert!(value_as_i64(&json!(null)).is_err());
        assert!(value_as_i64(&json!("abc")).is_err());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let store = UpstashStore::new("https://example.upstash.io/", "token").unwrap();
        assert_eq!(store.base_url, "https://example.upstash.io");
    }
}
