//! Send Contact Message Use Case

use crate::application::compose;
use crate::application::config::OutreachConfig;
use crate::domain::Email;
use crate::error::{OutreachError, OutreachResult};
use crate::infra::resend::Mailer;
use kernel::error::app_error::AppError;
use std::sync::Arc;

const NAME_MAX_LENGTH: usize = 100;
const SUBJECT_MAX_LENGTH: usize = 200;
const MESSAGE_MAX_LENGTH: usize = 5000;

/// Input DTO for the contact use case (honeypot already stripped)
#[derive(Debug, Clone)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactInput {
    /// Validate field lengths; the email gets full value-object validation
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.name.len() > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be between 1 and {} characters",
                NAME_MAX_LENGTH
            )));
        }
        if self.subject.trim().is_empty() || self.subject.len() > SUBJECT_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Subject must be between 1 and {} characters",
                SUBJECT_MAX_LENGTH
            )));
        }
        if self.message.trim().is_empty() || self.message.len() > MESSAGE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Message must be between 1 and {} characters",
                MESSAGE_MAX_LENGTH
            )));
        }
        Ok(())
    }
}

/// Send Contact Message Use Case
pub struct SendContactUseCase<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    config: Arc<OutreachConfig>,
}

impl<M> SendContactUseCase<M>
where
    M: Mailer + Sync,
{
    pub fn new(mailer: Arc<M>, config: Arc<OutreachConfig>) -> Self {
        Self { mailer, config }
    }

    /// Relay the message to the site owner, returning the provider send id
    pub async fn execute(&self, input: ContactInput, request_id: &str) -> OutreachResult<String> {
        let expose_detail = !self.config.production;

        input
            .validate()
            .map_err(|e| OutreachError::validation_from(e, request_id, expose_detail))?;
        let email = Email::new(&input.email)
            .map_err(|e| OutreachError::validation_from(e, request_id, expose_detail))?;

        let input = ContactInput {
            email: email.to_string(),
            ..input
        };

        let notification = compose::contact_notification(&self.config, &input);
        let id = self
            .mailer
            .send(&notification)
            .await
            .map_err(|e| OutreachError::SendFailed {
                request_id: request_id.to_string(),
                source: e,
            })?;

        tracing::info!(request_id, id, "Contact message relayed");

        // Best effort: a failed auto-reply must not fail the primary send
        let auto_reply = compose::contact_auto_reply(&self.config, &input);
        if let Err(e) = self.mailer.send(&auto_reply).await {
            tracing::warn!(request_id, error = %e, "Auto-reply send failed");
        }

        Ok(id)
    }
}
