//! Scripted `AuthProvider` and fixtures shared by router-level tests.
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use serde_json::{Value, json};
use url::Url;

use crate::config::{AppEnv, Config};
use crate::services::auth::provider::{
    ChangePassword, ForgetPassword, ResetPassword, SendVerificationEmail, SignInEmail, SignUpEmail,
};
use crate::services::auth::{
    AuthProvider, ProviderError, ProviderFailure, ProviderReply, ProviderResult, Session,
};
use crate::services::links::Links;
use crate::state::AppState;

#[derive(Debug, Clone)]
enum Outcome {
    Succeed,
    Reject(ProviderError),
    Unreachable,
}

/// One recorded provider call: operation name and the JSON it was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub body: Value,
}

#[derive(Clone)]
pub struct StubProvider {
    session: Option<Session>,
    session_fails: bool,
    outcome: Outcome,
    cookies: Vec<HeaderValue>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Default for StubProvider {
    fn default() -> Self {
        Self {
            session: None,
            session_fails: false,
            outcome: Outcome::Succeed,
            cookies: Vec::new(),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl StubProvider {
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_session_failure(mut self) -> Self {
        self.session_fails = true;
        self
    }

    /// Every non-session call answers with this rejection.
    pub fn rejecting(mut self, status: StatusCode, message: &str) -> Self {
        self.outcome = Outcome::Reject(ProviderError::new(status, message));
        self
    }

    /// Every non-session call fails before reaching the provider.
    pub fn unreachable(mut self) -> Self {
        self.outcome = Outcome::Unreachable;
        self
    }

    pub fn with_cookie(mut self, cookie: &'static str) -> Self {
        self.cookies.push(HeaderValue::from_static(cookie));
        self
    }

    /// Every non-session call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, op: &'static str, body: Value) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call { op, body });
        }
    }

    async fn reply<T>(&self, data: T) -> ProviderResult<ProviderReply<T>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Outcome::Succeed => Ok(ProviderReply::new(data).with_cookies(self.cookies.clone())),
            Outcome::Reject(err) => Err(ProviderFailure::Rejected(err.clone())),
            Outcome::Unreachable => Err(ProviderFailure::Transport("connection refused".into())),
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[async_trait]
impl AuthProvider for StubProvider {
    async fn sign_up_email(
        &self,
        req: SignUpEmail,
        _headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<Option<Value>>> {
        self.record("sign_up_email", to_json(&req));
        self.reply(Some(json!({ "id": "u1", "email": req.email, "name": req.name })))
            .await
    }

    async fn sign_in_email(
        &self,
        req: SignInEmail,
        _headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<Option<Value>>> {
        self.record("sign_in_email", to_json(&req));
        self.reply(Some(json!({ "id": "u1", "email": req.email }))).await
    }

    async fn sign_out(&self, _headers: &HeaderMap) -> ProviderResult<ProviderReply<()>> {
        self.record("sign_out", Value::Null);
        self.reply(()).await
    }

    async fn send_verification_email(
        &self,
        req: SendVerificationEmail,
        _headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        self.record("send_verification_email", to_json(&req));
        self.reply(()).await
    }

    async fn verify_email(
        &self,
        token: &str,
        _headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        self.record("verify_email", json!({ "token": token }));
        self.reply(()).await
    }

    async fn forget_password(
        &self,
        req: ForgetPassword,
        _headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        self.record("forget_password", to_json(&req));
        self.reply(()).await
    }

    async fn reset_password(
        &self,
        req: ResetPassword,
        _headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        self.record("reset_password", to_json(&req));
        self.reply(()).await
    }

    async fn change_password(
        &self,
        req: ChangePassword,
        _headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        self.record("change_password", to_json(&req));
        self.reply(()).await
    }

    async fn get_session(&self, _headers: &HeaderMap) -> ProviderResult<Option<Session>> {
        if self.session_fails {
            return Err(ProviderFailure::Transport("connection refused".into()));
        }
        Ok(self.session.clone())
    }
}

pub fn session(user_id: &str, email_verified: bool) -> Session {
    serde_json::from_value(json!({
        "session": { "id": "s1", "userId": user_id },
        "user": { "id": user_id, "email": "ada@example.com", "emailVerified": email_verified },
    }))
    .unwrap_or_else(|err| panic!("fixture session must deserialize: {err}"))
}

pub fn state_with(provider: StubProvider) -> AppState {
    let frontend = Url::parse("http://localhost:3000")
        .unwrap_or_else(|err| panic!("fixture url must parse: {err}"));
    AppState::new(Arc::new(provider), Links::new(&frontend), AppEnv::Development)
}

pub fn config() -> Config {
    config_with(&[])
}

/// The fixture config with some variables overridden.
pub fn config_with(overrides: &[(&str, &str)]) -> Config {
    Config::from_lookup(|key: &str| {
        if let Some((_, value)) = overrides.iter().find(|(name, _)| *name == key) {
            return Some(value.to_string());
        }
        match key {
            "AUTH_BASE_URL" => Some("http://127.0.0.1:9/api/auth".to_string()),
            "AUTH_SECRET" => Some("test-secret".to_string()),
            "BODY_LIMIT_BYTES" => Some("1024".to_string()),
            _ => None,
        }
    })
    .unwrap_or_else(|err| panic!("fixture config must load: {err}"))
}
