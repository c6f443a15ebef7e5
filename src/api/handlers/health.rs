/*
 * Responsibility
 * - GET /health (liveness, environment name, server time)
 */
use axum::extract::State;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::api::envelope::ApiSuccess;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    timestamp: String,
    environment: &'static str,
}

pub async fn health(State(state): State<AppState>) -> ApiSuccess<Health> {
    ApiSuccess::data(Health {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: state.app_env.as_str(),
    })
}
