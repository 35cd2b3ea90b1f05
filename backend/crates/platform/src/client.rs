//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // Check X-Forwarded-For header (first IP in the list)
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}

/// Build a rate-limit identifier from an endpoint prefix and a client IP
///
/// Prefixing keeps rate-limit domains for different endpoints independent
/// even when they share the same underlying store.
pub fn rate_limit_identifier(prefix: &str, ip: Option<IpAddr>) -> String {
    match ip {
        Some(ip) => format!("{}:{}", prefix, ip),
        None => format!("{}:unknown", prefix),
    }
}
