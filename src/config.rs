/*
 * Responsibility
 * - Load environment variables (.env included) into a typed Config
 * - Validate values up front; a missing or malformed value fails startup
 * - Secrets (auth secret, SMTP credentials) stay wrapped in SecretString
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Connection settings for the external auth provider.
#[derive(Debug, Clone)]
pub struct AuthProviderConfig {
    pub base_url: Url,
    pub secret: SecretString,
    pub timeout: Duration,
}

/// SMTP transport, chosen by which variables are present.
#[derive(Debug, Clone)]
pub enum MailTransportConfig {
    Brevo {
        host: String,
        port: u16,
        user: String,
        key: SecretString,
    },
    Smtp {
        host: String,
        port: u16,
        // implicit TLS; otherwise STARTTLS
        secure: bool,
        user: Option<String>,
        password: Option<SecretString>,
    },
    Unconfigured,
}

impl MailTransportConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Brevo { .. } => "brevo",
            Self::Smtp { .. } => "smtp",
            Self::Unconfigured => "unconfigured",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,
    pub from_is_default: bool,
    pub transport: MailTransportConfig,
}

impl MailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_var = non_empty(lookup("EMAIL_FROM"));
        let from_is_default = from_var.is_none();
        let from = from_var.unwrap_or_else(|| "noreply@example.com".to_string());

        let transport = if let Some(key) = non_empty(lookup("BREVO_SMTP_KEY")) {
            MailTransportConfig::Brevo {
                host: non_empty(lookup("BREVO_SMTP_HOST"))
                    .unwrap_or_else(|| "smtp-relay.brevo.com".to_string()),
                port: parse_or("BREVO_SMTP_PORT", lookup("BREVO_SMTP_PORT"), 587)?,
                user: non_empty(lookup("BREVO_SMTP_USER")).unwrap_or_else(|| from.clone()),
                key: SecretString::from(key),
            }
        } else if let Some(host) = non_empty(lookup("SMTP_HOST")) {
            MailTransportConfig::Smtp {
                host,
                port: parse_or("SMTP_PORT", lookup("SMTP_PORT"), 587)?,
                secure: lookup("SMTP_SECURE").is_some_and(|v| v.eq_ignore_ascii_case("true")),
                user: non_empty(lookup("SMTP_USER")),
                password: non_empty(lookup("SMTP_PASSWORD")).map(SecretString::from),
            }
        } else {
            MailTransportConfig::Unconfigured
        };

        Ok(Self {
            from,
            from_is_default,
            transport,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub frontend_url: Url,
    // exact-match origins, frontend origin first
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthProviderConfig,
    pub mail: MailConfig,

    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or("PORT", lookup("PORT"), 8000)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{port}"))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").or_else(|| lookup("NODE_ENV")));

        let frontend_url = Url::parse(
            &non_empty(lookup("FRONTEND_URL"))
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        )
        .map_err(|_| ConfigError::Invalid("FRONTEND_URL"))?;
        if frontend_url.host_str().is_none() {
            return Err(ConfigError::Invalid("FRONTEND_URL"));
        }

        let mut cors_allowed_origins = vec![frontend_url.origin().ascii_serialization()];
        for origin in lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
        {
            if !cors_allowed_origins.iter().any(|o| o == origin) {
                cors_allowed_origins.push(origin.to_string());
            }
        }

        let base_url = non_empty(lookup("AUTH_BASE_URL"))
            .ok_or(ConfigError::Missing("AUTH_BASE_URL"))?;
        let base_url = Url::parse(&base_url).map_err(|_| ConfigError::Invalid("AUTH_BASE_URL"))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid("AUTH_BASE_URL"));
        }

        let secret = non_empty(lookup("AUTH_SECRET"))
            .or_else(|| non_empty(lookup("BETTER_AUTH_SECRET")))
            .ok_or(ConfigError::Missing("AUTH_SECRET"))?;

        let auth_timeout: u64 = parse_or("AUTH_TIMEOUT_SECONDS", lookup("AUTH_TIMEOUT_SECONDS"), 10)?;

        let mail = MailConfig::from_lookup(&lookup)?;

        let body_limit_bytes: usize = parse_or(
            "BODY_LIMIT_BYTES",
            lookup("BODY_LIMIT_BYTES"),
            10 * 1024 * 1024,
        )?;
        let request_timeout: u64 = parse_or(
            "REQUEST_TIMEOUT_SECONDS",
            lookup("REQUEST_TIMEOUT_SECONDS"),
            30,
        )?;

        Ok(Self {
            addr,
            app_env,
            frontend_url,
            cors_allowed_origins,
            auth: AuthProviderConfig {
                base_url,
                secret: SecretString::from(secret),
                timeout: Duration::from_secs(auth_timeout),
            },
            mail,
            body_limit_bytes,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid(key)),
    }
}
