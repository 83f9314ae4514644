//! HTTP surface of doc-search: sessions, repository selection, search and
//! history over axum.

use std::{error::Error, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;


use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::{app_state::AppState, config::ApiConfig};
pub use crate::error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        health_route::health,
        history::history_route::{clear_history, recent_history},
        repositories_route::list_repositories,
        search::search_route::search,
        session::session_route::{create_session, end_session, get_session, select_repository},
    },
};

/// All routes over `state`, with client-error bodies normalized.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/repositories", get(list_repositories))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/repository", put(select_repository))
        .route("/sessions/{id}/search", post(search))
        .route(
            "/sessions/{id}/history",
            get(recent_history).delete(clear_history),
        )
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

pub async fn start() -> Result<(), Box<dyn Error>> {
    let cfg = ApiConfig::from_env()?;
    let state = Arc::new(AppState::from_env(&cfg)?);
    let app = router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&cfg.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.address, "doc-search API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
