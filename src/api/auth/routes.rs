/*
 * Responsibility
 * - URL layout under /api/auth
 * - Session-protected routes get require_auth via route_layer
 */
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::auth::handlers;
use crate::middleware::session::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/session", get(handlers::get_session))
        .route("/sign-out", post(handlers::sign_out))
        .route("/change-password", post(handlers::change_password))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/sign-up/email", post(handlers::sign_up))
        .route("/sign-in/email", post(handlers::sign_in))
        .route(
            "/send-verification-email",
            post(handlers::send_verification_email),
        )
        .route("/verify-email", get(handlers::verify_email))
        .route(
            "/request-password-reset",
            post(handlers::request_password_reset),
        )
        .route("/reset-password", post(handlers::reset_password))
        .merge(protected)
}
