//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256 signing, constant-time comparison)
//! - Client identification (proxy-aware IP extraction)
//! - Rate limiting infrastructure

pub mod client;
pub mod crypto;
pub mod rate_limit;
