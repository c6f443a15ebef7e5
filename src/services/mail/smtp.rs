use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use crate::config::MailTransportConfig;
use crate::services::mail::{EmailSender, MailError, OutgoingEmail};

/// SMTP delivery through lettre's Tokio transport.
///
/// Brevo and plain SMTP share this type; only the relay settings differ.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &MailTransportConfig, from: &str) -> Result<Self, MailError> {
        let from: Mailbox = from.parse().map_err(|e: lettre::address::AddressError| {
            MailError::Address {
                address: from.to_string(),
                reason: e.to_string(),
            }
        })?;

        let transport = match config {
            MailTransportConfig::Brevo {
                host,
                port,
                user,
                key,
            } => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| MailError::Build(e.to_string()))?
                .port(*port)
                .credentials(Credentials::new(
                    user.clone(),
                    key.expose_secret().to_string(),
                ))
                .build(),
            MailTransportConfig::Smtp {
                host,
                port,
                secure,
                user,
                password,
            } => {
                let builder = if *secure {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                }
                .map_err(|e| MailError::Build(e.to_string()))?
                .port(*port);

                match user {
                    Some(user) => builder
                        .credentials(Credentials::new(
                            user.clone(),
                            password
                                .as_ref()
                                .map(|p| p.expose_secret().to_string())
                                .unwrap_or_default(),
                        ))
                        .build(),
                    None => builder.build(),
                }
            }
            MailTransportConfig::Unconfigured => return Err(MailError::NotConfigured),
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    #[tracing::instrument(name = "smtp.send", skip_all, fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let to: Mailbox = email.to.parse().map_err(|e: lettre::address::AddressError| {
            MailError::Address {
                address: email.to.clone(),
                reason: e.to_string(),
            }
        })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))?;

        tracing::info!("attempting to send email");

        let response = self.transport.send(message).await.map_err(|e| {
            tracing::error!(error = %e, "failed to send email");
            MailError::Send(e.to_string())
        })?;

        tracing::info!(code = %response.code(), "email sent");
        Ok(())
    }
}

/// Used when the environment names no transport; every send fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredEmailSender;

#[async_trait]
impl EmailSender for UnconfiguredEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::error!(to = %email.to, subject = %email.subject, "email service not configured");
        Err(MailError::NotConfigured)
    }
}
