//! GET /health: provider probes and FAQ index readiness. Never fails.

use axum::{extract::State, http::StatusCode, response::Response};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::health::health_response::{FaqIndexHealth, HealthResponse},
};

pub async fn health(State(state): State<AppState>) -> Response {
    let providers = state.llm_profiles.health_all().await;
    let generation = state.store.generation().await;
    debug!(
        providers_ok = providers.iter().filter(|p| p.ok).count(),
        providers = providers.len(),
        index_ready = generation.is_some(),
        "health snapshot"
    );

    ApiResponse::success(HealthResponse {
        providers,
        faq_index: FaqIndexHealth {
            backend: state.store.backend(),
            ready: generation.is_some(),
            generation,
        },
    })
    .into_response_with_status(StatusCode::OK)
}
