//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Request body for POST /api/contact
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Honeypot field; real browsers leave it empty
    #[serde(default)]
    pub website: Option<String>,
    pub csrf_hash: String,
    pub csrf_expires_at: i64,
}

/// Response for POST /api/contact
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub request_id: String,
    pub id: String,
}

/// Request body for POST /api/newsletter
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterRequest {
    pub email: String,
    /// Honeypot field; real browsers leave it empty
    #[serde(default)]
    pub honeypot: Option<String>,
    pub csrf_hash: String,
    pub csrf_expires_at: i64,
}

/// Response for POST /api/newsletter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterResponse {
    pub success: bool,
    pub request_id: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_id: Option<String>,
}

/// Request body for POST /api/newsletter/unsubscribe
///
/// All fields default so that missing parameters surface as a link
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub t: Option<i64>,
    #[serde(default)]
    pub sig: String,
}

/// Response for POST /api/newsletter/unsubscribe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
}
