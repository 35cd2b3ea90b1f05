//! Local File-Backed Limiter
//!
//! Sliding-window limiter over a small persisted JSON map, used standalone
//! in non-production environments or as fallback when the distributed
//! backend is unreachable.
//!
//! The document maps `identifier -> { timestamps: [epoch_ms, ...] }`. Every
//! check prunes expired timestamps for all identifiers and drops empty
//! entries, which bounds file growth. Rejected attempts do not append a
//! timestamp (only admitted requests consume window budget) and nothing is
//! persisted for them.
//!
//! A per-process mutex serializes the read-modify-write cycle across tokio
//! workers. Two *processes* sharing the file can still race; that is
//! documented, accepted behavior for this fallback-only path.

use platform::rate_limit::{RateLimitConfig, RateLimitDecision, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// One identifier's recent request timestamps, insertion order = chronological
#[derive(Debug, Default, Serialize, Deserialize)]
struct WindowEntry {
    timestamps: Vec<i64>,
}

type WindowMap = HashMap<String, WindowEntry>;

/// File-backed sliding window store
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Fixed default location under the OS temp directory
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join("rate-limit-windows.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Clock-injected sliding-window check
    pub async fn check_at(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitDecision, StoreError> {
        let _guard = self.lock.lock().await;

        let mut map = self.read_map().await;

        // Prune expired timestamps for every identifier, not just the target
        let cutoff = now_ms - config.window_ms();
        map.retain(|_, entry| {
            entry.timestamps.retain(|&t| t > cutoff);
            !entry.timestamps.is_empty()
        });

        let entry = map.entry(identifier.to_string()).or_default();
        let count = entry.timestamps.len() as u32;
        let oldest = entry.timestamps.first().copied();
        let reset_at_ms = oldest.unwrap_or(now_ms) + config.window_ms();

        if count >= config.max_requests {
            // Rejected attempts do not consume budget; skip the write
            return Ok(RateLimitDecision::denied(config.max_requests, reset_at_ms));
        }

        let remaining = config.max_requests - count - 1;
        entry.timestamps.push(now_ms);

        self.write_map(&map).await?;

        Ok(RateLimitDecision::admitted(
            config.max_requests,
            remaining,
            reset_at_ms,
        ))
    }

    /// Read the persisted document; unreadable or corrupt content is treated
    /// as an empty map (availability over strict accounting on this path)
    async fn read_map(&self) -> WindowMap {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(_) => return WindowMap::new(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Corrupt rate limit store, starting from an empty window map"
                );
                WindowMap::new()
            }
        }
    }

    /// Persist the whole document; write failures surface as a limiter
    /// failure rather than silently admitting traffic
    async fn write_map(&self, map: &WindowMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec(map)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

impl platform::rate_limit::RateLimitStore for FileStore {
    async fn check(
        &self,
        identifier: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitDecision, StoreError> {
        self.check_at(identifier, config, chrono::Utc::now().timestamp_millis())
            .await
    }
}
