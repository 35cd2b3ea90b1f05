//! Infrastructure layer - rate limit store implementations

pub mod file_store;
pub mod upstash;
