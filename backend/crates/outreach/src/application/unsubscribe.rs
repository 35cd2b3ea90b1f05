//! Newsletter Unsubscribe Use Case
//!
//! Authorized by the signed link alone; no CSRF token is involved. The
//! email is matched byte-for-byte against the signed payload, so no
//! normalization happens here.

use crate::error::{OutreachError, OutreachResult};
use crate::infra::resend::{AudienceStore, RemoveOutcome};
use guard::GuardConfig;
use guard::domain::signed_link;
use std::sync::Arc;

/// Newsletter Unsubscribe Use Case
pub struct UnsubscribeUseCase<M>
where
    M: AudienceStore,
{
    audience: Arc<M>,
    guard: Arc<GuardConfig>,
}

impl<M> UnsubscribeUseCase<M>
where
    M: AudienceStore + Sync,
{
    pub fn new(audience: Arc<M>, guard: Arc<GuardConfig>) -> Self {
        Self { audience, guard }
    }

    /// Validate the signed link and remove the contact; idempotent for
    /// emails the audience no longer (or never) contained
    pub async fn execute(
        &self,
        email: &str,
        issued_at_ms: Option<i64>,
        signature: &str,
        request_id: &str,
    ) -> OutreachResult<String> {
        signed_link::validate_unsubscribe_link(
            email,
            issued_at_ms,
            signature,
            &self.guard.signing_secret,
            self.guard.unsubscribe_ttl_ms(),
        )
        .map_err(|reason| OutreachError::InvalidLink {
            reason,
            request_id: request_id.to_string(),
        })?;

        match self.audience.remove_contact(email).await {
            Ok(RemoveOutcome::Removed) => {
                tracing::info!(request_id, "Newsletter contact removed");
            }
            Ok(RemoveOutcome::NotFound) => {
                tracing::info!(request_id, "Contact not in audience, treating as unsubscribed");
            }
            Err(e) => {
                return Err(OutreachError::SendFailed {
                    request_id: request_id.to_string(),
                    source: e,
                });
            }
        }

        Ok("You have been unsubscribed.".to_string())
    }
}
