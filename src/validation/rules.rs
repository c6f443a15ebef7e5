/*
 * Responsibility
 * - Field-level rules reused across endpoint schemas
 * - Each rule normalizes its input (trim, lower-case) and returns every failed message
 */
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

pub type RuleResult<T> = Result<T, Vec<&'static str>>;

pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 128;
pub const NAME_MAX_CHARS: usize = 100;

const STRENGTH_MESSAGE: &str =
    "Password must contain at least one uppercase letter, one lowercase letter, and one number";

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Wording for password fields; change-password speaks of the "New password".
#[derive(Debug, Clone, Copy)]
pub struct PasswordMessages {
    pub required: &'static str,
    pub too_short: &'static str,
    pub too_long: &'static str,
}

impl PasswordMessages {
    pub const PASSWORD: Self = Self {
        required: "Password is required",
        too_short: "Password must be at least 8 characters",
        too_long: "Password must not exceed 128 characters",
    };

    pub const NEW_PASSWORD: Self = Self {
        required: "New password is required",
        too_short: "New password must be at least 8 characters",
        too_long: "New password must not exceed 128 characters",
    };
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn valid_email(email_normalized: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .is_some_and(|regex| regex.is_match(email_normalized))
}

pub fn email(raw: Option<&str>) -> RuleResult<String> {
    let normalized = raw.map(normalize_email).unwrap_or_default();
    if normalized.is_empty() {
        return Err(vec!["Email is required"]);
    }
    if !valid_email(&normalized) {
        return Err(vec!["Invalid email address"]);
    }
    Ok(normalized)
}

pub fn name(raw: Option<&str>) -> RuleResult<String> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(vec!["Name is required"]);
    }
    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(vec!["Name must not exceed 100 characters"]);
    }
    Ok(trimmed.to_string())
}

/// Length-only password check, used where the provider already holds the
/// password (sign-in).
pub fn password(raw: Option<&str>, messages: PasswordMessages) -> RuleResult<String> {
    let Some(value) = raw else {
        return Err(vec![messages.required]);
    };
    let issues = length_issues(value, messages);
    if issues.is_empty() {
        Ok(value.to_string())
    } else {
        Err(issues)
    }
}

/// Length plus character-class check for passwords being set.
pub fn strong_password(raw: Option<&str>, messages: PasswordMessages) -> RuleResult<String> {
    let Some(value) = raw else {
        return Err(vec![messages.required]);
    };
    let mut issues = length_issues(value, messages);
    if !has_required_classes(value) {
        issues.push(STRENGTH_MESSAGE);
    }
    if issues.is_empty() {
        Ok(value.to_string())
    } else {
        Err(issues)
    }
}

/// Non-empty string, kept verbatim (tokens, current password).
pub fn required(raw: Option<&str>, message: &'static str) -> RuleResult<String> {
    match raw {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(vec![message]),
    }
}

/// Absent is fine; present must be an absolute URL.
pub fn optional_url(raw: Option<&str>, message: &'static str) -> RuleResult<Option<String>> {
    match raw {
        None => Ok(None),
        Some(value) => Url::parse(value)
            .map(|_| Some(value.to_string()))
            .map_err(|_| vec![message]),
    }
}

fn length_issues(value: &str, messages: PasswordMessages) -> Vec<&'static str> {
    let len = value.chars().count();
    if len < PASSWORD_MIN_CHARS {
        vec![messages.too_short]
    } else if len > PASSWORD_MAX_CHARS {
        vec![messages.too_long]
    } else {
        Vec::new()
    }
}

fn has_required_classes(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
}
