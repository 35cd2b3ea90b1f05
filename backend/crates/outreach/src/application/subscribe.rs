//! Newsletter Subscribe Use Case

use crate::application::compose;
use crate::application::config::OutreachConfig;
use crate::domain::Email;
use crate::error::{OutreachError, OutreachResult};
use crate::infra::resend::{AudienceStore, Mailer};
use guard::GuardConfig;
use guard::domain::signed_link;
use std::sync::Arc;

/// Output DTO for subscribe
#[derive(Debug, Clone)]
pub struct SubscribeOutput {
    pub contact_id: String,
    pub audience_id: Option<String>,
}

/// Newsletter Subscribe Use Case
pub struct SubscribeUseCase<M>
where
    M: Mailer + AudienceStore,
{
    mailer: Arc<M>,
    config: Arc<OutreachConfig>,
    guard: Arc<GuardConfig>,
}

impl<M> SubscribeUseCase<M>
where
    M: Mailer + AudienceStore + Sync,
{
    pub fn new(mailer: Arc<M>, config: Arc<OutreachConfig>, guard: Arc<GuardConfig>) -> Self {
        Self {
            mailer,
            config,
            guard,
        }
    }

    pub async fn execute(&self, email: &str, request_id: &str) -> OutreachResult<SubscribeOutput> {
        let email = Email::new(email)
            .map_err(|e| OutreachError::validation_from(e, request_id, !self.config.production))?;

        let contact_id = self
            .mailer
            .add_contact(email.as_str())
            .await
            .map_err(|e| OutreachError::SendFailed {
                request_id: request_id.to_string(),
                source: e,
            })?;

        tracing::info!(request_id, contact_id, "Newsletter contact added");

        let unsubscribe_url = signed_link::generate_unsubscribe_url(
            email.as_str(),
            &self.config.base_url,
            &self.guard.signing_secret,
        )
        .map_err(|e| OutreachError::Internal {
            request_id: request_id.to_string(),
            detail: format!("failed to build unsubscribe link: {}", e),
        })?;

        // Best effort: the subscription stands even if the welcome email fails
        let welcome = compose::newsletter_welcome(&self.config, email.as_str(), &unsubscribe_url);
        if let Err(e) = self.mailer.send(&welcome).await {
            tracing::warn!(request_id, error = %e, "Welcome email send failed");
        }

        Ok(SubscribeOutput {
            contact_id,
            audience_id: self.config.audience_id.clone(),
        })
    }
}
