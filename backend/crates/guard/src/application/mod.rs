//! Application layer - configuration and the rate-limiter facade

pub mod config;
pub mod rate_limiter;
