/*
 * Responsibility
 * - Typed failures crossing the provider adapter boundary
 * - Known provider error codes are mapped once here; message matching is only the fallback
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::services::mail::MailError;

pub type ProviderResult<T> = Result<T, ProviderFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    EmailNotVerified,
    UserExists,
    InvalidToken,
}

/// A request the provider answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("auth provider rejected request ({status}): {message}")]
pub struct ProviderError {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Kind derived from the provider's machine code, when it sent one we know.
    pub fn coded_kind(&self) -> Option<ProviderErrorKind> {
        let code = self.code.as_deref()?.to_ascii_uppercase();
        match code.as_str() {
            "EMAIL_NOT_VERIFIED" => Some(ProviderErrorKind::EmailNotVerified),
            "USER_ALREADY_EXISTS"
            | "USER_ALREADY_EXISTS_USE_ANOTHER_EMAIL"
            | "USER_EXISTS"
            | "EMAIL_ALREADY_EXISTS" => Some(ProviderErrorKind::UserExists),
            "INVALID_TOKEN" | "TOKEN_EXPIRED" | "INVALID_OR_EXPIRED_TOKEN" => {
                Some(ProviderErrorKind::InvalidToken)
            }
            _ => None,
        }
    }

    pub fn is(&self, kind: ProviderErrorKind) -> bool {
        if let Some(coded) = self.coded_kind() {
            return coded == kind;
        }

        // TODO: drop the substring fallback once the provider sends codes on every error path.
        let message = self.message.to_lowercase();
        match kind {
            ProviderErrorKind::EmailNotVerified => message.contains("email"),
            ProviderErrorKind::UserExists => {
                message.contains("exists") || message.contains("already")
            }
            ProviderErrorKind::InvalidToken => message.contains("token"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderFailure {
    #[error(transparent)]
    Rejected(#[from] ProviderError),

    #[error("auth email delivery failed: {0}")]
    EmailDelivery(#[from] MailError),

    #[error("auth provider unreachable: {0}")]
    Transport(String),

    #[error("unexpected auth provider reply: {0}")]
    Decode(String),
}
