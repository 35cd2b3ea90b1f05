//! Guard - request protection for mutating API endpoints
//!
//! Clean Architecture structure:
//! - `domain/` - Pure protection logic (CSRF tokens, signed links)
//! - `application/` - Configuration and the rate-limiter facade
//! - `infra/` - Limiter store implementations (local file, Upstash REST)
//! - `presentation/` - HTTP handlers (CSRF token endpoint)
//!
//! ## Security Model
//! - One process-wide signing secret backs both CSRF tokens and unsubscribe
//!   links; production refuses to start without a strong secret
//! - CSRF tokens and signed links are stateless: validity is a function of
//!   signature plus elapsed time, so replay inside the window is accepted
//! - The distributed limiter is the source of truth under concurrent load;
//!   the file-backed limiter is a fallback and development backend only

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GuardConfig;
pub use application::rate_limiter::RateLimiter;
pub use error::{GuardError, GuardResult};
pub use infra::file_store::FileStore;
pub use infra::upstash::UpstashStore;
pub use presentation::router::csrf_router;
