//! API DTOs (Data Transfer Objects)

use serde::Serialize;

/// Response for GET /api/csrf
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfResponse {
    pub token: String,
    pub hash: String,
    pub expires_at: i64,
}
