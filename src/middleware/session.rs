//! Session guards.
//!
//! `require_auth` resolves the caller's session through the provider and puts
//! it in the request extensions, where `CurrentSession` picks it up.
//! `require_email_verified` must run after it. `optional_auth` attaches a
//! session when one resolves and otherwise lets the request through.
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/session", get(get_session))
//!     .route_layer(middleware::from_fn_with_state(state, require_auth));
//! ```

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::extractors::CurrentSession;
use crate::error::AppError;
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = match state.provider.get_session(req.headers()).await {
        Ok(Some(session)) => session,
        Ok(None) => return Err(AppError::Unauthorized("Authentication required. Please sign in.")),
        Err(err) => {
            tracing::warn!(error = %err, "session lookup failed");
            return Err(AppError::Unauthorized("Invalid or expired session"));
        }
    };

    // middleware → extractor
    req.extensions_mut().insert(CurrentSession(session));

    Ok(next.run(req).await)
}

pub async fn require_email_verified(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let verified = match req.extensions().get::<CurrentSession>() {
        Some(CurrentSession(session)) => session.user.email_verified,
        None => return Err(AppError::Unauthorized("Authentication required")),
    };

    if !verified {
        return Err(AppError::EmailNotVerified);
    }

    Ok(next.run(req).await)
}

pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match state.provider.get_session(req.headers()).await {
        Ok(Some(session)) => {
            req.extensions_mut().insert(CurrentSession(session));
        }
        Ok(None) => {}
        Err(err) => {
            tracing::debug!(error = %err, "optional session lookup failed; continuing anonymously");
        }
    }

    next.run(req).await
}
