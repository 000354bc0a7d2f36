//! HTTP surface of the maintainer bot.
//!
//! `POST /gitlab/callback` receives GitLab webhooks and hands merge request
//! events to [`mr_assigner::Dispatcher`]; `GET /health` reports liveness.

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use gitlab_client::{GitLabClient, SourceControl};
use mr_assigner::{Dispatcher, RandomPicker};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::{AppConfig, AppState, ConfigError},
    error_handler::AppError,
    middleware_layer::request_id::ensure_request_id,
    routes::{gitlab_webhook::gitlab_webhook_route::gitlab_webhook_route, health_route::health_route},
};

/// How long to wait for queued chat messages after the server stops.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the application router for `state`.
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: SourceControl + 'static,
{
    Router::new()
        .route("/gitlab/callback", post(gitlab_webhook_route::<S>))
        .route("/health", get(health_route::<S>))
        .layer(middleware::from_fn(ensure_request_id))
        .with_state(state)
}

/// Loads configuration, wires the services and serves until Ctrl+C / SIGTERM.
pub async fn start() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    let client = GitLabClient::from_config(config.gitlab.clone()).map_err(ConfigError::from)?;
    let (sink, worker) = chat_service::sink::start(&config.chat).map_err(ConfigError::from)?;
    let chat_enabled = sink.is_enabled();

    info!(
        gitlab = %client.base_api(),
        chat_enabled,
        projects_with_channels = config.channels.len(),
        "maintainer bot configured"
    );

    let dispatcher = Dispatcher::new(
        Arc::new(client),
        Arc::new(RandomPicker),
        sink,
        Arc::new(config.channels),
    );
    let state = Arc::new(AppState::new(dispatcher, config.webhook_secret, chat_enabled));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(AppError::Bind)?;
    info!(addr = %config.listen_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    // The router (and its sink) is gone; the worker stops once in-flight
    // dispatch tasks release their clones.
    if let Some(worker) = worker {
        match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
            Ok(Ok(())) => info!("chat worker drained"),
            Ok(Err(err)) => warn!(error = %err, "chat worker panicked"),
            Err(_) => warn!("chat worker still busy at shutdown, giving up"),
        }
    }

    info!("shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
