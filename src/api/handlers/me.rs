use axum::extract::State;
use axum::http::HeaderMap;

use crate::api::envelope::ApiSuccess;
use crate::error::AppError;
use crate::services::auth::Session;
use crate::state::AppState;

/// GET /api/me: echoes the caller's session, resolved directly (no guard layer).
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<Session>, AppError> {
    match state.provider.get_session(&headers).await {
        Ok(Some(session)) => Ok(ApiSuccess::data(session)),
        Ok(None) => Err(AppError::Unauthorized("Authentication required")),
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch session");
            Err(AppError::Internal("Failed to fetch session"))
        }
    }
}
