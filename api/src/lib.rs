//! HTTP surface of the shoe assistant.
//!
//! - `POST /ask` `{"query": "..."}` → `{success, data: {route, confidence, answer}}`
//! - `GET /health` → provider probes and FAQ index readiness

mod core;
mod error_handler;
mod routes;

pub use crate::core::app_state::AppState;
pub use error_handler::{AppError, AppResult};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::routes::{ask::ask_route::ask, health::health_route::health};

/// Route table, exposed for in-process tests.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/health", get(health))
        .with_state(state)
}

/// Serves on `API_ADDRESS` until Ctrl+C.
pub async fn start(state: AppState) -> AppResult<()> {
    let host_url = std::env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(AppError::MissingEnv("API_ADDRESS"))?;

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "api listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
