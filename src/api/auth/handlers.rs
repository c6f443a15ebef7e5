/*
 * Responsibility
 * - One handler per /api/auth operation: validate → provider call → envelope
 * - Provider-issued Set-Cookie headers are passed through to the client
 * - Error classification lives in AppError; handlers only propagate with `?`
 */
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::api::auth::dto::{
    ChangePasswordRequest, RequestResetRequest, ResetPasswordRequest, SendVerificationRequest,
    SignInRequest, SignUpRequest, VerifyEmailQuery,
};
use crate::api::envelope::ApiSuccess;
use crate::api::extractors::{CurrentSession, JsonBody};
use crate::error::AppError;
use crate::services::auth::{ProviderFailure, Session};
use crate::state::AppState;
use crate::validation::ValidationErrors;

const RESET_REQUESTED: &str =
    "If an account exists with this email, you will receive a password reset link.";

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: Option<Value>,
}

pub async fn sign_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<SignUpRequest>,
) -> Result<ApiSuccess<UserData>, AppError> {
    let req = body.validate(state.links.verify_email())?;
    let reply = state.provider.sign_up_email(req, &headers).await?;

    Ok(ApiSuccess::data(UserData { user: reply.data })
        .with_status(StatusCode::CREATED)
        .with_message(
            "Account created successfully. Please check your email to verify your account.",
        )
        .with_cookies(reply.cookies))
}

pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<SignInRequest>,
) -> Result<ApiSuccess<UserData>, AppError> {
    let req = body.validate(state.links.dashboard())?;
    let reply = state.provider.sign_in_email(req, &headers).await?;

    Ok(ApiSuccess::data(UserData { user: reply.data })
        .with_message("Signed in successfully")
        .with_cookies(reply.cookies))
}

pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess, AppError> {
    let reply = state.provider.sign_out(&headers).await?;
    Ok(ApiSuccess::message("Signed out successfully").with_cookies(reply.cookies))
}

pub async fn send_verification_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<SendVerificationRequest>,
) -> Result<ApiSuccess, AppError> {
    let req = body.validate(state.links.verify_email())?;
    let reply = state.provider.send_verification_email(req, &headers).await?;

    Ok(
        ApiSuccess::message("Verification email sent successfully. Please check your inbox.")
            .with_cookies(reply.cookies),
    )
}

pub async fn verify_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<VerifyEmailQuery>, QueryRejection>,
) -> Result<ApiSuccess, AppError> {
    let Query(query) =
        query.map_err(|rejection| ValidationErrors::single("query", rejection.body_text()))?;
    let token = query.validate()?;
    let reply = state.provider.verify_email(&token, &headers).await?;

    Ok(ApiSuccess::message("Email verified successfully. You can now sign in.")
        .with_cookies(reply.cookies))
}

/// Answers the same way whether or not the account exists or the provider
/// call failed; only malformed input is reported.
pub async fn request_password_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<RequestResetRequest>,
) -> Result<ApiSuccess, AppError> {
    let req = body.validate(state.links.reset_password())?;

    match state.provider.forget_password(req, &headers).await {
        Ok(_) => {}
        Err(ProviderFailure::Rejected(err)) => {
            tracing::info!(status = %err.status, error = %err, "password reset request rejected");
        }
        Err(err) => {
            tracing::error!(error = %err, "password reset request failed");
        }
    }

    Ok(ApiSuccess::message(RESET_REQUESTED))
}

pub async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<ApiSuccess, AppError> {
    let req = body.validate()?;
    let reply = state.provider.reset_password(req, &headers).await?;

    Ok(ApiSuccess::message(
        "Password reset successfully. You can now sign in with your new password.",
    )
    .with_cookies(reply.cookies))
}

pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> Result<ApiSuccess, AppError> {
    let req = body.validate()?;
    let reply = state.provider.change_password(req, &headers).await?;

    Ok(ApiSuccess::message("Password changed successfully").with_cookies(reply.cookies))
}

pub async fn get_session(CurrentSession(session): CurrentSession) -> ApiSuccess<Session> {
    ApiSuccess::data(session)
}
