//! Outreach - contact form and newsletter backend
//!
//! Clean Architecture structure:
//! - `domain/` - Value objects (validated email address)
//! - `application/` - Use cases (send contact, subscribe, unsubscribe)
//! - `infra/` - Mail provider client (Resend HTTP API)
//! - `presentation/` - HTTP handlers
//!
//! ## Protection Model
//! - Every mutating endpoint is rate limited before anything else runs
//! - Browser-originated forms carry a CSRF token (header) plus hash (body)
//! - Unsubscribe requests are authorized by a signed link, not a CSRF token
//! - Honeypot fields silently absorb bot traffic with a success response

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::OutreachConfig;
pub use error::{OutreachError, OutreachResult};
pub use infra::resend::ResendClient;
pub use presentation::router::{outreach_router, outreach_router_generic};
