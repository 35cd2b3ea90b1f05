//! Application Configuration
//!
//! Configuration for the outreach application layer. Rate limit settings
//! are resolved here once, at the boundary between transport and core, and
//! passed explicitly at call sites.

use platform::rate_limit::RateLimitConfig;

/// Outreach configuration
#[derive(Debug, Clone)]
pub struct OutreachConfig {
    /// Public base URL used when building unsubscribe links
    pub base_url: String,
    /// From address for all outbound email
    pub sender: String,
    /// Recipient of contact form notifications
    pub contact_recipient: String,
    /// Provider audience the newsletter subscribes contacts into
    pub audience_id: Option<String>,
    /// Production deployments hide validation detail from clients
    pub production: bool,
    /// Rate limit for POST /contact
    pub contact_limit: RateLimitConfig,
    /// Rate limit for POST /newsletter
    pub newsletter_limit: RateLimitConfig,
    /// Rate limit for POST /newsletter/unsubscribe
    pub unsubscribe_limit: RateLimitConfig,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            sender: "Website <noreply@example.com>".to_string(),
            contact_recipient: "hello@example.com".to_string(),
            audience_id: None,
            production: false,
            contact_limit: RateLimitConfig::new(5, 600),
            newsletter_limit: RateLimitConfig::new(5, 600),
            unsubscribe_limit: RateLimitConfig::new(10, 600),
        }
    }
}

impl OutreachConfig {
    /// Create config for development
    pub fn development() -> Self {
        Self::default()
    }
}
