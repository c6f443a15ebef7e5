//! Outbound email: templates, the delivery abstraction, and the SMTP transport.
pub mod auth_emails;
pub mod smtp;
pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{MailConfig, MailTransportConfig};

pub use auth_emails::AuthEmails;
pub use smtp::{SmtpEmailSender, UnconfiguredEmailSender};
pub use templates::EmailTemplate;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email service not configured. Please set BREVO_SMTP_KEY or SMTP credentials.")]
    NotConfigured,
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },
    #[error("failed to build email: {0}")]
    Build(String),
    #[error("failed to send email: {0}")]
    Send(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutgoingEmail {
    pub fn from_template(to: impl Into<String>, template: EmailTemplate) -> Self {
        Self {
            to: to.into(),
            subject: template.subject.to_string(),
            html: template.html,
            text: template.text,
        }
    }
}

/// Delivery abstraction; the transport decides how the message leaves the process.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Pick the transport the environment configured.
pub fn build_sender(config: &MailConfig) -> Result<Arc<dyn EmailSender>, MailError> {
    let sender: Arc<dyn EmailSender> = match &config.transport {
        MailTransportConfig::Unconfigured => {
            tracing::warn!("no SMTP transport configured; auth emails will fail to send");
            Arc::new(UnconfiguredEmailSender)
        }
        transport => Arc::new(SmtpEmailSender::new(transport, &config.from)?),
    };
    tracing::info!(transport = config.transport.name(), from = %config.from, "mail transport ready");
    Ok(sender)
}
