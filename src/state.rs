/*
 * Responsibility
 * - Shared context cloned into every handler (AppState)
 * - Built once at startup by app::build_state; immutable afterwards
 */
use std::sync::Arc;

use crate::config::AppEnv;
use crate::services::auth::AuthProvider;
use crate::services::links::Links;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AuthProvider>,
    pub links: Arc<Links>,
    pub app_env: AppEnv,
}

impl AppState {
    pub fn new(provider: Arc<dyn AuthProvider>, links: Links, app_env: AppEnv) -> Self {
        Self {
            provider,
            links: Arc::new(links),
            app_env,
        }
    }
}
