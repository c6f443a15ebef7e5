/*
 * Responsibility
 * - The single error type handlers and middleware return (AppError)
 * - IntoResponse: classify, log the raw error, render the error envelope
 * - Provider rejections are mapped to stable codes here and nowhere else
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{ProviderError, ProviderErrorKind, ProviderFailure};
use crate::validation::{FieldError, ValidationErrors};

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    EmailNotVerified,
    InvalidCredentials,
    UserExists,
    InvalidToken,
    AuthError,
    Unauthorized,
    InvalidJson,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    RequestTimeout,
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Provider(#[from] ProviderFailure),
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("email not verified")]
    EmailNotVerified,
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("route not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("request timed out")]
    Timeout,
    /// The message is shown to the client; the cause has already been logged.
    #[error("internal server error: {0}")]
    Internal(&'static str),
}

impl AppError {
    pub fn internal() -> Self {
        Self::Internal(GENERIC_MESSAGE)
    }

    /// Status, code and client-facing message this error renders as.
    pub fn classify(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationError,
                "Invalid input data".into(),
            ),
            AppError::Provider(ProviderFailure::Rejected(err)) => classify_rejection(err),
            AppError::Provider(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                GENERIC_MESSAGE.into(),
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                (*message).into(),
            ),
            AppError::EmailNotVerified => (
                StatusCode::FORBIDDEN,
                ErrorCode::EmailNotVerified,
                "Please verify your email address to access this resource".into(),
            ),
            AppError::InvalidJson(_) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidJson,
                "Invalid JSON in request body".into(),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                "Route not found".into(),
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorCode::MethodNotAllowed,
                "Method not allowed".into(),
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorCode::PayloadTooLarge,
                "Request body is too large".into(),
            ),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                ErrorCode::RequestTimeout,
                "Request timed out".into(),
            ),
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                (*message).into(),
            ),
        }
    }
}

fn classify_rejection(err: &ProviderError) -> (StatusCode, ErrorCode, String) {
    let status = err.status;

    if status == StatusCode::FORBIDDEN && err.is(ProviderErrorKind::EmailNotVerified) {
        return (
            StatusCode::FORBIDDEN,
            ErrorCode::EmailNotVerified,
            "Please verify your email address before signing in".into(),
        );
    }

    if status == StatusCode::UNAUTHORIZED {
        return (
            StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidCredentials,
            "Invalid email or password".into(),
        );
    }

    if matches!(status, StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST)
        && err.is(ProviderErrorKind::UserExists)
    {
        return (
            StatusCode::CONFLICT,
            ErrorCode::UserExists,
            "An account with this email already exists".into(),
        );
    }

    if status == StatusCode::BAD_REQUEST && err.is(ProviderErrorKind::InvalidToken) {
        return (
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidToken,
            "The token is invalid or has expired".into(),
        );
    }

    (status, ErrorCode::AuthError, err.message.clone())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        if status.is_server_error() {
            tracing::error!(error = %self, ?code, "request failed");
        } else {
            tracing::warn!(error = %self, ?code, "request rejected");
        }

        let details = match self {
            AppError::Validation(errors) => Some(errors.into_fields()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
