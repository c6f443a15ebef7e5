//! HTTP adapter for an external auth server.
//!
//! Requests carry the caller's cookies and user agent upstream and a bearer
//! credential identifying this service. `Set-Cookie` headers from the reply are
//! handed back to the handler. A reply may ask this service to deliver an auth
//! email (`delivery`), which goes through the injected `AuthMailer` before the
//! call returns; a failed send fails the call.
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::AuthProviderConfig;
use crate::services::auth::error::{ProviderError, ProviderFailure, ProviderResult};
use crate::services::auth::mailer::{AuthMailer, Recipient};
use crate::services::auth::provider::{
    AuthProvider, ChangePassword, ForgetPassword, ProviderReply, ResetPassword,
    SendVerificationEmail, Session, SignInEmail, SignUpEmail,
};

const FORWARDED_HEADERS: [HeaderName; 4] = [
    header::COOKIE,
    header::USER_AGENT,
    header::ORIGIN,
    HeaderName::from_static("x-forwarded-for"),
];

const DEFAULT_REJECTION_MESSAGE: &str = "Authentication failed";

#[derive(Clone)]
pub struct RemoteAuthProvider {
    client: Client,
    base_url: Url,
    secret: SecretString,
    mailer: Arc<dyn AuthMailer>,
}

struct RawReply {
    body: Bytes,
    cookies: Vec<HeaderValue>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    user: Option<Value>,
    #[serde(default)]
    delivery: Option<Delivery>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum Delivery {
    VerifyEmail { user: Recipient, url: String },
    ResetPassword { user: Recipient, url: String },
    PasswordChanged { user: Recipient },
}

#[derive(Debug, Default, Deserialize)]
struct RejectionBody {
    code: Option<String>,
    message: Option<String>,
}

impl RemoteAuthProvider {
    pub fn new(config: &AuthProviderConfig, mailer: Arc<dyn AuthMailer>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        // `Url::join` replaces the last segment unless the base ends with '/'
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            secret: config.secret.clone(),
            mailer,
        })
    }

    fn endpoint(&self, path: &str) -> ProviderResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderFailure::Transport(format!("invalid endpoint {path}: {e}")))
    }

    async fn send(&self, request: RequestBuilder, headers: &HeaderMap) -> ProviderResult<RawReply> {
        let mut request = request.bearer_auth(self.secret.expose_secret());
        for name in &FORWARDED_HEADERS {
            for value in headers.get_all(name) {
                request = request.header(name, value);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderFailure::Transport(e.to_string()))?;

        let status = response.status();
        let cookies: Vec<HeaderValue> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .cloned()
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(rejection(status, &body).into());
        }

        Ok(RawReply { body, cookies })
    }

    async fn post<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
        headers: &HeaderMap,
    ) -> ProviderResult<RawReply> {
        let mut request = self.client.post(self.endpoint(path)?);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, headers).await
    }

    /// Decode a mutating call's reply and run any delivery it asks for.
    async fn finish(&self, raw: RawReply) -> ProviderResult<ProviderReply<Option<Value>>> {
        let body: ReplyBody = decode(&raw.body)?;
        if let Some(delivery) = body.delivery {
            self.deliver(delivery).await?;
        }
        Ok(ProviderReply::new(body.user).with_cookies(raw.cookies))
    }

    async fn deliver(&self, delivery: Delivery) -> ProviderResult<()> {
        let result = match &delivery {
            Delivery::VerifyEmail { user, url } => self.mailer.send_verification(user, url).await,
            Delivery::ResetPassword { user, url } => self.mailer.send_reset(user, url).await,
            Delivery::PasswordChanged { user } => self.mailer.send_password_changed(user).await,
        };

        if let Err(err) = &result {
            tracing::error!(error = %err, kind = delivery.kind(), "auth email delivery failed");
        }
        result.map_err(ProviderFailure::from)
    }
}

impl Delivery {
    fn kind(&self) -> &'static str {
        match self {
            Self::VerifyEmail { .. } => "verify-email",
            Self::ResetPassword { .. } => "reset-password",
            Self::PasswordChanged { .. } => "password-changed",
        }
    }
}

fn rejection(status: StatusCode, body: &[u8]) -> ProviderError {
    let parsed: RejectionBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());

    let error = ProviderError::new(status, message);
    match parsed.code {
        Some(code) => error.with_code(code),
        None => error,
    }
}

fn decode<T: DeserializeOwned + Default>(body: &[u8]) -> ProviderResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ProviderFailure::Decode(e.to_string()))
}

#[async_trait]
impl AuthProvider for RemoteAuthProvider {
    async fn sign_up_email(
        &self,
        req: SignUpEmail,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<Option<Value>>> {
        let raw = self.post("sign-up/email", Some(&req), headers).await?;
        self.finish(raw).await
    }

    async fn sign_in_email(
        &self,
        req: SignInEmail,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<Option<Value>>> {
        let raw = self.post("sign-in/email", Some(&req), headers).await?;
        self.finish(raw).await
    }

    async fn sign_out(&self, headers: &HeaderMap) -> ProviderResult<ProviderReply<()>> {
        let raw = self.post::<()>("sign-out", None, headers).await?;
        Ok(ProviderReply::new(()).with_cookies(raw.cookies))
    }

    async fn send_verification_email(
        &self,
        req: SendVerificationEmail,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        let raw = self.post("send-verification-email", Some(&req), headers).await?;
        let reply = self.finish(raw).await?;
        Ok(ProviderReply::new(()).with_cookies(reply.cookies))
    }

    async fn verify_email(
        &self,
        token: &str,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        let request = self
            .client
            .get(self.endpoint("verify-email")?)
            .query(&[("token", token)]);
        let raw = self.send(request, headers).await?;
        let reply = self.finish(raw).await?;
        Ok(ProviderReply::new(()).with_cookies(reply.cookies))
    }

    async fn forget_password(
        &self,
        req: ForgetPassword,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        let raw = self.post("request-password-reset", Some(&req), headers).await?;
        let reply = self.finish(raw).await?;
        Ok(ProviderReply::new(()).with_cookies(reply.cookies))
    }

    async fn reset_password(
        &self,
        req: ResetPassword,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        let raw = self.post("reset-password", Some(&req), headers).await?;
        let reply = self.finish(raw).await?;
        Ok(ProviderReply::new(()).with_cookies(reply.cookies))
    }

    async fn change_password(
        &self,
        req: ChangePassword,
        headers: &HeaderMap,
    ) -> ProviderResult<ProviderReply<()>> {
        let raw = self.post("change-password", Some(&req), headers).await?;
        let reply = self.finish(raw).await?;
        Ok(ProviderReply::new(()).with_cookies(reply.cookies))
    }

    async fn get_session(&self, headers: &HeaderMap) -> ProviderResult<Option<Session>> {
        let request = self.client.get(self.endpoint("get-session")?);
        let raw = self.send(request, headers).await?;
        decode::<Option<Session>>(&raw.body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::extract::{OriginalUri, Query, State};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::services::auth::error::ProviderErrorKind;
    use crate::services::auth::provider::{
        ChangePassword, ForgetPassword, Password, ResetPassword, SendVerificationEmail,
    };
    use crate::services::mail::MailError;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl AuthMailer for RecordingMailer {
        async fn send_verification(&self, to: &Recipient, url: &str) -> Result<(), MailError> {
            self.record("verify", &to.email, url)
        }

        async fn send_reset(&self, to: &Recipient, url: &str) -> Result<(), MailError> {
            self.record("reset", &to.email, url)
        }

        async fn send_password_changed(&self, to: &Recipient) -> Result<(), MailError> {
            self.record("changed", &to.email, "")
        }
    }

    impl RecordingMailer {
        fn record(&self, kind: &str, to: &str, url: &str) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Send("smtp down".to_string()));
            }
            if let Ok(mut sent) = self.sent.lock() {
                sent.push((kind.to_string(), format!("{to} {url}")));
            }
            Ok(())
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().map(|s| s.clone()).unwrap_or_default()
        }
    }

    #[derive(Clone, Default)]
    struct Upstream {
        seen: Arc<Mutex<Vec<(String, Option<String>, Option<String>)>>>,
        bodies: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl Upstream {
        fn record(&self, path: &str, headers: &HeaderMap) {
            let cookie = headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let auth = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            if let Ok(mut seen) = self.seen.lock() {
                seen.push((path.to_string(), cookie, auth));
            }
        }

        fn bodies(&self) -> Vec<(String, Value)> {
            self.bodies.lock().map(|b| b.clone()).unwrap_or_default()
        }
    }

    /// Shared handler for the account-mutation endpoints; the reply depends on the path.
    async fn mutation(
        State(up): State<Upstream>,
        OriginalUri(uri): OriginalUri,
        headers: HeaderMap,
        body: Bytes,
    ) -> axum::response::Response {
        let path = uri.path().trim_start_matches("/api/auth/").to_string();
        up.record(&path, &headers);
        let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        if let Ok(mut bodies) = up.bodies.lock() {
            bodies.push((path.clone(), body.clone()));
        }

        let reply = match path.as_str() {
            "send-verification-email" => json!({
                "delivery": {
                    "kind": "verify-email",
                    "user": { "email": body["email"], "name": "Ada" },
                    "url": format!("{}?token=v1", body["callbackURL"].as_str().unwrap_or_default()),
                },
            }),
            "request-password-reset" => json!({
                "delivery": {
                    "kind": "reset-password",
                    "user": { "email": body["email"], "name": "Ada" },
                    "url": format!("{}?token=r1", body["redirectTo"].as_str().unwrap_or_default()),
                },
            }),
            "reset-password" => json!({
                "status": true,
                "delivery": {
                    "kind": "password-changed",
                    "user": { "email": "ada@example.com", "name": "Ada" },
                },
            }),
            _ => json!({ "status": true }),
        };

        (
            [(header::SET_COOKIE, format!("touched={path}; Path=/"))],
            Json(reply),
        )
            .into_response()
    }

    async fn sign_up(
        State(up): State<Upstream>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> axum::response::Response {
        up.record("sign-up", &headers);
        if body["email"] == "taken@example.com" {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "code": "USER_ALREADY_EXISTS", "message": "User already exists" })),
            )
                .into_response();
        }
        Json(json!({
            "user": { "id": "u1", "email": body["email"] },
            "delivery": {
                "kind": "verify-email",
                "user": { "email": body["email"], "name": body["name"] },
                "url": "https://hood.example/auth/verify-email?token=t1",
            },
        }))
        .into_response()
    }

    async fn sign_in(State(up): State<Upstream>, headers: HeaderMap) -> axum::response::Response {
        up.record("sign-in", &headers);
        (
            [(header::SET_COOKIE, "session_token=abc; HttpOnly; Path=/")],
            Json(json!({ "user": { "id": "u1" } })),
        )
            .into_response()
    }

    async fn get_session(State(up): State<Upstream>, headers: HeaderMap) -> Json<Value> {
        up.record("get-session", &headers);
        if headers.contains_key(header::COOKIE) {
            Json(json!({ "session": { "id": "s1" }, "user": { "id": "u1", "emailVerified": false } }))
        } else {
            Json(Value::Null)
        }
    }

    async fn verify(Query(q): Query<std::collections::HashMap<String, String>>) -> axum::response::Response {
        if q.get("token").map(String::as_str) == Some("good") {
            StatusCode::OK.into_response()
        } else {
            (StatusCode::BAD_REQUEST, "plain text, not json").into_response()
        }
    }

    async fn spawn_upstream() -> anyhow::Result<(Url, Upstream)> {
        let up = Upstream::default();
        let app = Router::new()
            .route("/api/auth/sign-up/email", post(sign_up))
            .route("/api/auth/sign-in/email", post(sign_in))
            .route("/api/auth/get-session", get(get_session))
            .route("/api/auth/verify-email", get(verify))
            .route("/api/auth/sign-out", post(mutation))
            .route("/api/auth/send-verification-email", post(mutation))
            .route("/api/auth/request-password-reset", post(mutation))
            .route("/api/auth/reset-password", post(mutation))
            .route("/api/auth/change-password", post(mutation))
            .with_state(up.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok((Url::parse(&format!("http://{addr}/api/auth"))?, up))
    }

    fn provider(base_url: Url, mailer: Arc<dyn AuthMailer>) -> anyhow::Result<RemoteAuthProvider> {
        let config = AuthProviderConfig {
            base_url,
            secret: SecretString::from("svc-secret"),
            timeout: Duration::from_secs(5),
        };
        Ok(RemoteAuthProvider::new(&config, mailer)?)
    }

    fn sign_up_req(email: &str) -> SignUpEmail {
        SignUpEmail {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: Password::new("Str0ngPass"),
            image: None,
            callback_url: "http://localhost:3000/auth/verify-email".to_string(),
        }
    }

    #[tokio::test]
    async fn sign_up_delivers_verification_email() -> anyhow::Result<()> {
        let (base, up) = spawn_upstream().await?;
        let mailer = Arc::new(RecordingMailer::default());
        let provider = provider(base, mailer.clone())?;

        let reply = provider
            .sign_up_email(sign_up_req("ada@example.com"), &HeaderMap::new())
            .await?;

        assert_eq!(reply.data, Some(json!({ "id": "u1", "email": "ada@example.com" })));
        assert_eq!(
            mailer.sent(),
            [(
                "verify".to_string(),
                "ada@example.com https://hood.example/auth/verify-email?token=t1".to_string()
            )]
        );
        let seen = up.seen.lock().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(seen[0].2.as_deref(), Some("Bearer svc-secret"));
        Ok(())
    }

    #[tokio::test]
    async fn failed_delivery_fails_the_call() -> anyhow::Result<()> {
        let (base, _up) = spawn_upstream().await?;
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..Default::default()
        });
        let provider = provider(base, mailer)?;

        let result = provider
            .sign_up_email(sign_up_req("ada@example.com"), &HeaderMap::new())
            .await;

        assert!(matches!(result, Err(ProviderFailure::EmailDelivery(_))));
        Ok(())
    }

    #[tokio::test]
    async fn rejection_carries_status_code_and_message() -> anyhow::Result<()> {
        let (base, _up) = spawn_upstream().await?;
        let provider = provider(base, Arc::new(RecordingMailer::default()))?;

        let result = provider
            .sign_up_email(sign_up_req("taken@example.com"), &HeaderMap::new())
            .await;

        match result {
            Err(ProviderFailure::Rejected(err)) => {
                assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(err.message, "User already exists");
                assert!(err.is(ProviderErrorKind::UserExists));
            }
            other => anyhow::bail!("expected rejection, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn non_json_rejection_gets_default_message() -> anyhow::Result<()> {
        let (base, _up) = spawn_upstream().await?;
        let provider = provider(base, Arc::new(RecordingMailer::default()))?;

        match provider.verify_email("bad", &HeaderMap::new()).await {
            Err(ProviderFailure::Rejected(err)) => {
                assert_eq!(err.status, StatusCode::BAD_REQUEST);
                assert_eq!(err.message, DEFAULT_REJECTION_MESSAGE);
                assert!(err.code.is_none());
            }
            other => anyhow::bail!("expected rejection, got {other:?}"),
        }
        assert!(provider.verify_email("good", &HeaderMap::new()).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_returns_upstream_cookies() -> anyhow::Result<()> {
        let (base, _up) = spawn_upstream().await?;
        let provider = provider(base, Arc::new(RecordingMailer::default()))?;

        let reply = provider
            .sign_in_email(
                SignInEmail {
                    email: "ada@example.com".to_string(),
                    password: Password::new("Str0ngPass"),
                    remember_me: true,
                    callback_url: "http://localhost:3000/dashboard".to_string(),
                },
                &HeaderMap::new(),
            )
            .await?;

        assert_eq!(
            reply.cookies,
            [HeaderValue::from_static("session_token=abc; HttpOnly; Path=/")]
        );
        Ok(())
    }

    #[tokio::test]
    async fn get_session_forwards_cookie_and_decodes_null() -> anyhow::Result<()> {
        let (base, up) = spawn_upstream().await?;
        let provider = provider(base, Arc::new(RecordingMailer::default()))?;

        assert!(provider.get_session(&HeaderMap::new()).await?.is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_token=abc"));
        let session = provider.get_session(&headers).await?;
        assert_eq!(session.map(|s| s.user.email_verified), Some(false));

        let seen = up.seen.lock().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(seen[1].1.as_deref(), Some("session_token=abc"));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_failure() -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let provider = provider(
            Url::parse(&format!("http://{addr}/api/auth"))?,
            Arc::new(RecordingMailer::default()),
        )?;
        let result = provider.get_session(&HeaderMap::new()).await;
        assert!(matches!(result, Err(ProviderFailure::Transport(_))));
        Ok(())
    }

    #[tokio::test]
    async fn send_verification_posts_callback_and_sends_verify_email() -> anyhow::Result<()> {
        let (base, up) = spawn_upstream().await?;
        let mailer = Arc::new(RecordingMailer::default());
        let provider = provider(base, mailer.clone())?;

        provider
            .send_verification_email(
                SendVerificationEmail {
                    email: "ada@example.com".to_string(),
                    callback_url: "http://localhost:3000/auth/verify-email".to_string(),
                },
                &HeaderMap::new(),
            )
            .await?;

        assert_eq!(
            up.bodies(),
            [(
                "send-verification-email".to_string(),
                json!({
                    "email": "ada@example.com",
                    "callbackURL": "http://localhost:3000/auth/verify-email",
                })
            )]
        );
        assert_eq!(
            mailer.sent(),
            [(
                "verify".to_string(),
                "ada@example.com http://localhost:3000/auth/verify-email?token=v1".to_string()
            )]
        );
        Ok(())
    }

    #[tokio::test]
    async fn forget_password_posts_redirect_and_sends_reset_email() -> anyhow::Result<()> {
        let (base, up) = spawn_upstream().await?;
        let mailer = Arc::new(RecordingMailer::default());
        let provider = provider(base, mailer.clone())?;

        provider
            .forget_password(
                ForgetPassword {
                    email: "ada@example.com".to_string(),
                    redirect_to: "http://localhost:3000/auth/reset-password".to_string(),
                },
                &HeaderMap::new(),
            )
            .await?;

        assert_eq!(
            up.bodies(),
            [(
                "request-password-reset".to_string(),
                json!({
                    "email": "ada@example.com",
                    "redirectTo": "http://localhost:3000/auth/reset-password",
                })
            )]
        );
        assert_eq!(
            mailer.sent(),
            [(
                "reset".to_string(),
                "ada@example.com http://localhost:3000/auth/reset-password?token=r1".to_string()
            )]
        );
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_sends_password_changed_notice() -> anyhow::Result<()> {
        let (base, up) = spawn_upstream().await?;
        let mailer = Arc::new(RecordingMailer::default());
        let provider = provider(base, mailer.clone())?;

        provider
            .reset_password(
                ResetPassword {
                    new_password: Password::new("N3wPassword"),
                    token: "r1".to_string(),
                },
                &HeaderMap::new(),
            )
            .await?;

        assert_eq!(
            up.bodies(),
            [(
                "reset-password".to_string(),
                json!({ "newPassword": "N3wPassword", "token": "r1" })
            )]
        );
        assert_eq!(
            mailer.sent(),
            [("changed".to_string(), "ada@example.com ".to_string())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn change_password_posts_wire_body_without_email() -> anyhow::Result<()> {
        let (base, up) = spawn_upstream().await?;
        let mailer = Arc::new(RecordingMailer::default());
        let provider = provider(base, mailer.clone())?;

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_token=abc"));
        let reply = provider
            .change_password(
                ChangePassword {
                    new_password: Password::new("N3wPassword"),
                    current_password: Password::new("Old1Password"),
                    revoke_other_sessions: true,
                },
                &headers,
            )
            .await?;

        assert_eq!(
            up.bodies(),
            [(
                "change-password".to_string(),
                json!({
                    "newPassword": "N3wPassword",
                    "currentPassword": "Old1Password",
                    "revokeOtherSessions": true,
                })
            )]
        );
        assert_eq!(
            reply.cookies,
            [HeaderValue::from_static("touched=change-password; Path=/")]
        );
        assert!(mailer.sent().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn sign_out_forwards_cookie_and_returns_cleared_cookie() -> anyhow::Result<()> {
        let (base, up) = spawn_upstream().await?;
        let provider = provider(base, Arc::new(RecordingMailer::default()))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_token=abc"));
        let reply = provider.sign_out(&headers).await?;

        assert_eq!(
            reply.cookies,
            [HeaderValue::from_static("touched=sign-out; Path=/")]
        );
        let seen = up.seen.lock().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(seen[0].0, "sign-out");
        assert_eq!(seen[0].1.as_deref(), Some("session_token=abc"));
        assert_eq!(up.bodies(), [("sign-out".to_string(), Value::Null)]);
        Ok(())
    }
}
