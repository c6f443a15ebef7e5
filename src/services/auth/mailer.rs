use async_trait::async_trait;
use serde::Deserialize;

use crate::services::mail::MailError;

/// Who an auth email goes to, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Name used in the greeting line.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() { "there" } else { trimmed }
    }
}

/// Email capability the provider adapter receives at construction.
///
/// Errors propagate: a failed send fails the provider call that asked for it.
#[async_trait]
pub trait AuthMailer: Send + Sync {
    async fn send_verification(&self, to: &Recipient, url: &str) -> Result<(), MailError>;

    async fn send_reset(&self, to: &Recipient, url: &str) -> Result<(), MailError>;

    async fn send_password_changed(&self, to: &Recipient) -> Result<(), MailError>;
}
