/*
 * Responsibility
 * - Load config, build dependencies, assemble the Router
 * - Apply middleware (request id, trace, timeout, body limit, CORS)
 * - Serve with axum::serve(); Ctrl-C triggers graceful shutdown
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers};
use crate::config::Config;
use crate::middleware;
use crate::services::auth::RemoteAuthProvider;
use crate::services::links::Links;
use crate::services::mail::{self, AuthEmails};
use crate::state::AppState;

pub fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,hood_backend=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving other requests.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = config.app_env.as_str(),
        addr = %config.addr,
        provider = %config.auth.base_url,
        mail = config.mail.transport.name(),
        "starting hood-backend"
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
            tracing::info!("gracefully shutting down");
        })
        .await?;

    Ok(())
}

/// Build process-level services and inject them into the shared state.
pub fn build_state(config: &Config) -> Result<AppState> {
    let sender = mail::build_sender(&config.mail).context("failed to build email sender")?;
    let mailer = Arc::new(AuthEmails::new(sender));
    let provider = RemoteAuthProvider::new(&config.auth, mailer)
        .context("failed to build auth provider client")?;

    Ok(AppState::new(
        Arc::new(provider),
        Links::new(&config.frontend_url),
        config.app_env,
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/me", get(handlers::me::me))
        .nest("/api/auth", api::auth::routes(state.clone()))
        .fallback(handlers::fallback::not_found)
        .method_not_allowed_fallback(handlers::fallback::method_not_allowed)
        .with_state(state);

    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}
