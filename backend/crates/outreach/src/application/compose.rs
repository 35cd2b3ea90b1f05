//! Email composition
//!
//! Plain-text bodies only. Template rendering is a presentation concern the
//! provider side handles; the core just needs deterministic text.

use crate::application::config::OutreachConfig;
use crate::application::send_contact::ContactInput;
use crate::infra::resend::OutboundEmail;

/// Notification to the site owner about a contact form submission
pub fn contact_notification(config: &OutreachConfig, input: &ContactInput) -> OutboundEmail {
    OutboundEmail {
        from: config.sender.clone(),
        to: config.contact_recipient.clone(),
        subject: format!("[Contact] {}", input.subject),
        text: format!(
            "New contact form submission\n\nName: {}\nEmail: {}\nSubject: {}\n\n{}\n",
            input.name, input.email, input.subject, input.message
        ),
        reply_to: Some(input.email.clone()),
    }
}

/// Confirmation sent back to the person who submitted the form
pub fn contact_auto_reply(config: &OutreachConfig, input: &ContactInput) -> OutboundEmail {
    OutboundEmail {
        from: config.sender.clone(),
        to: input.email.clone(),
        subject: "We received your message".to_string(),
        text: format!(
            "Hi {},\n\nThanks for reaching out. We received your message about \
             \"{}\" and will get back to you soon.\n",
            input.name, input.subject
        ),
        reply_to: None,
    }
}

/// Welcome email for a new newsletter subscriber, carrying the signed
/// unsubscribe link
pub fn newsletter_welcome(
    config: &OutreachConfig,
    subscriber: &str,
    unsubscribe_url: &str,
) -> OutboundEmail {
    OutboundEmail {
        from: config.sender.clone(),
        to: subscriber.to_string(),
        subject: "Welcome to the newsletter".to_string(),
        text: format!(
            "Thanks for subscribing!\n\nYou can unsubscribe at any time:\n{}\n",
            unsubscribe_url
        ),
        reply_to: None,
    }
}
