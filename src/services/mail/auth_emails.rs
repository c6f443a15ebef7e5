use std::sync::Arc;

use async_trait::async_trait;

use crate::services::auth::mailer::{AuthMailer, Recipient};
use crate::services::mail::{EmailSender, MailError, OutgoingEmail, templates};

/// Renders auth templates and hands them to the configured sender.
#[derive(Clone)]
pub struct AuthEmails {
    sender: Arc<dyn EmailSender>,
}

impl AuthEmails {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl AuthMailer for AuthEmails {
    async fn send_verification(&self, to: &Recipient, url: &str) -> Result<(), MailError> {
        let template = templates::verify_email(url, to.display_name())?;
        self.sender
            .send(&OutgoingEmail::from_template(&to.email, template))
            .await
    }

    async fn send_reset(&self, to: &Recipient, url: &str) -> Result<(), MailError> {
        let template = templates::reset_password(url, to.display_name())?;
        self.sender
            .send(&OutgoingEmail::from_template(&to.email, template))
            .await
    }

    async fn send_password_changed(&self, to: &Recipient) -> Result<(), MailError> {
        let template = templates::password_changed(to.display_name())?;
        self.sender
            .send(&OutgoingEmail::from_template(&to.email, template))
            .await
    }
}
