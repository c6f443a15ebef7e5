/*
 * Responsibility
 * - HTML + plain-text bodies for the three auth notices, rendered from templates/email/
 * - HTML bodies are autoescaped by askama; plain-text bodies are not
 */
use askama::Template;

use crate::services::mail::MailError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: &'static str,
    pub html: String,
    pub text: String,
}

#[derive(Template)]
#[template(path = "email/verify_email.html")]
struct VerifyEmailHtml<'a> {
    url: &'a str,
    user_name: &'a str,
}

#[derive(Template)]
#[template(path = "email/verify_email.txt")]
struct VerifyEmailText<'a> {
    url: &'a str,
    user_name: &'a str,
}

#[derive(Template)]
#[template(path = "email/reset_password.html")]
struct ResetPasswordHtml<'a> {
    url: &'a str,
    user_name: &'a str,
}

#[derive(Template)]
#[template(path = "email/reset_password.txt")]
struct ResetPasswordText<'a> {
    url: &'a str,
    user_name: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_changed.html")]
struct PasswordChangedHtml<'a> {
    user_name: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_changed.txt")]
struct PasswordChangedText<'a> {
    user_name: &'a str,
}

fn render(template: &impl Template) -> Result<String, MailError> {
    template
        .render()
        .map_err(|e| MailError::Build(format!("template render failed: {e}")))
}

pub fn verify_email(url: &str, user_name: &str) -> Result<EmailTemplate, MailError> {
    Ok(EmailTemplate {
        subject: "Verify your email address",
        html: render(&VerifyEmailHtml { url, user_name })?,
        text: render(&VerifyEmailText { url, user_name })?,
    })
}

pub fn reset_password(url: &str, user_name: &str) -> Result<EmailTemplate, MailError> {
    Ok(EmailTemplate {
        subject: "Reset your password",
        html: render(&ResetPasswordHtml { url, user_name })?,
        text: render(&ResetPasswordText { url, user_name })?,
    })
}

pub fn password_changed(user_name: &str) -> Result<EmailTemplate, MailError> {
    Ok(EmailTemplate {
        subject: "Your password has been changed",
        html: render(&PasswordChangedHtml { user_name })?,
        text: render(&PasswordChangedText { user_name })?,
    })
}
