//! Request bodies for `/api/auth/*`.
//!
//! Every field is optional on the wire so that a missing field is reported
//! through the same `details` list as an invalid one. `validate` either returns
//! the provider request built from normalized values or every failed field.
use serde::Deserialize;

use crate::services::auth::provider::{
    ChangePassword, ForgetPassword, Password, ResetPassword, SendVerificationEmail, SignInEmail,
    SignUpEmail,
};
use crate::validation::rules::{self, PasswordMessages};
use crate::validation::{ValidationErrors, field};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub image: Option<String>,
}

impl SignUpRequest {
    pub fn validate(self, callback_url: String) -> Result<SignUpEmail, ValidationErrors> {
        let name = field("name", rules::name(self.name.as_deref()));
        let email = field("email", rules::email(self.email.as_deref()));
        let password = field(
            "password",
            rules::strong_password(self.password.as_deref(), PasswordMessages::PASSWORD),
        );
        let image = field(
            "image",
            rules::optional_url(self.image.as_deref(), "Invalid image URL"),
        );

        match (name, email, password, image) {
            (Ok(name), Ok(email), Ok(password), Ok(image)) => Ok(SignUpEmail {
                name,
                email,
                password: Password::new(password),
                image,
                callback_url,
            }),
            (name, email, password, image) => Err(ValidationErrors::collect([
                name.err(),
                email.err(),
                password.err(),
                image.err(),
            ])),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub remember_me: Option<bool>,
}

impl SignInRequest {
    pub fn validate(self, callback_url: String) -> Result<SignInEmail, ValidationErrors> {
        let email = field("email", rules::email(self.email.as_deref()));
        let password = field(
            "password",
            rules::password(self.password.as_deref(), PasswordMessages::PASSWORD),
        );

        match (email, password) {
            (Ok(email), Ok(password)) => Ok(SignInEmail {
                email,
                password: Password::new(password),
                remember_me: self.remember_me.unwrap_or(true),
                callback_url,
            }),
            (email, password) => Err(ValidationErrors::collect([email.err(), password.err()])),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SendVerificationRequest {
    pub email: Option<String>,
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
}

impl SendVerificationRequest {
    /// `default_callback` is used when the client sent no `callbackURL`.
    pub fn validate(self, default_callback: String) -> Result<SendVerificationEmail, ValidationErrors> {
        let email = field("email", rules::email(self.email.as_deref()));
        let callback = field(
            "callbackURL",
            rules::optional_url(self.callback_url.as_deref(), "Invalid callback URL"),
        );

        match (email, callback) {
            (Ok(email), Ok(callback)) => Ok(SendVerificationEmail {
                email,
                callback_url: callback.unwrap_or(default_callback),
            }),
            (email, callback) => Err(ValidationErrors::collect([email.err(), callback.err()])),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

impl VerifyEmailQuery {
    pub fn validate(self) -> Result<String, ValidationErrors> {
        field(
            "token",
            rules::required(self.token.as_deref(), "Verification token is required"),
        )
        .map_err(|errors| ValidationErrors::collect([Some(errors)]))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResetRequest {
    pub email: Option<String>,
    pub redirect_to: Option<String>,
}

impl RequestResetRequest {
    pub fn validate(self, default_redirect: String) -> Result<ForgetPassword, ValidationErrors> {
        let email = field("email", rules::email(self.email.as_deref()));
        let redirect = field(
            "redirectTo",
            rules::optional_url(self.redirect_to.as_deref(), "Invalid redirect URL"),
        );

        match (email, redirect) {
            (Ok(email), Ok(redirect)) => Ok(ForgetPassword {
                email,
                redirect_to: redirect.unwrap_or(default_redirect),
            }),
            (email, redirect) => Err(ValidationErrors::collect([email.err(), redirect.err()])),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: Option<String>,
    pub token: Option<String>,
}

impl ResetPasswordRequest {
    pub fn validate(self) -> Result<ResetPassword, ValidationErrors> {
        let new_password = field(
            "newPassword",
            rules::strong_password(self.new_password.as_deref(), PasswordMessages::PASSWORD),
        );
        let token = field(
            "token",
            rules::required(self.token.as_deref(), "Reset token is required"),
        );

        match (new_password, token) {
            (Ok(new_password), Ok(token)) => Ok(ResetPassword {
                new_password: Password::new(new_password),
                token,
            }),
            (new_password, token) => {
                Err(ValidationErrors::collect([new_password.err(), token.err()]))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: Option<String>,
    pub current_password: Option<String>,
    pub revoke_other_sessions: Option<bool>,
}

impl ChangePasswordRequest {
    pub fn validate(self) -> Result<ChangePassword, ValidationErrors> {
        let new_password = field(
            "newPassword",
            rules::strong_password(self.new_password.as_deref(), PasswordMessages::NEW_PASSWORD),
        );
        let current_password = field(
            "currentPassword",
            rules::required(self.current_password.as_deref(), "Current password is required"),
        );

        match (new_password, current_password) {
            (Ok(new_password), Ok(current_password)) => Ok(ChangePassword {
                new_password: Password::new(new_password),
                current_password: Password::new(current_password),
                revoke_other_sessions: self.revoke_other_sessions.unwrap_or(false),
            }),
            (new_password, current_password) => Err(ValidationErrors::collect([
                new_password.err(),
                current_password.err(),
            ])),
        }
    }
}
