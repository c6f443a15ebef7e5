//! The seam between this service and the external auth provider.
//!
//! Handlers and middleware only see `AuthProvider`; credential checks, session
//! issuance and token storage all happen on the provider side.
use std::fmt;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::services::auth::error::ProviderResult;

/// A password in transit to the provider. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(\"[REDACTED]\")")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpEmail {
    pub name: String,
    pub email: String,
    pub password: Password,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInEmail {
    pub email: String,
    pub password: Password,
    pub remember_me: bool,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendVerificationEmail {
    pub email: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgetPassword {
    pub email: String,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    pub new_password: Password,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub new_password: Password,
    pub current_password: Password,
    pub revoke_other_sessions: bool,
}

/// Provider session, opaque apart from the user's verification flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub session: Value,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    // absent counts as unverified
    #[serde(rename = "emailVerified", default)]
    pub email_verified: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SessionUser {
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }
}

/// A successful provider call plus the cookies it wants set on the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderReply<T> {
    pub data: T,
    pub cookies: Vec<HeaderValue>,
}

impl<T> ProviderReply<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cookies: Vec::new(),
        }
    }

    pub fn with_cookies(mut self, cookies: Vec<HeaderValue>) -> Self {
        self.cookies = cookies;
        self
    }
}

/// Operations delegated to the external auth provider.
///
/// `headers` are the caller's request headers; implementations decide which
/// of them (cookies, user agent) travel upstream.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up_email(
        &self,
        req: SignUpEmail,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<Option<Value>>>;

    async fn sign_in_email(
        &self,
        req: SignInEmail,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<Option<Value>>>;

    async fn sign_out(&self, headers: &HeaderMap) -> ProviderResult<ProviderReply<()>>;

    async fn send_verification_email(
        &self,
        req: SendVerificationEmail,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>>;

    async fn verify_email(
        &self,
        token: &str,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>>;

    async fn forget_password(
        &self,
        req: ForgetPassword,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>>;

    async fn reset_password(
        &self,
        req: ResetPassword,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>>;

    async fn change_password(
        &self,
        req: ChangePassword,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>>;

    /// `Ok(None)` when the request carries no valid session.
    async fn get_session(&self, headers: &HeaderMap) -> ProviderResult<Option<Session>>;
}
