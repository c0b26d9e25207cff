//! POST /ask: routes the query and answers it.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/ask \
///   -H 'content-type: application/json' \
///   -d '{"query":"Are there any Puma shoes on sale?"}'
/// ```
pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let query = body.query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("`query` must not be empty".into()));
    }

    let request_id = headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");
    debug!(request_id = %request_id, query_len = query.len(), "ask: start");

    let answer = state.assistant.answer(query).await?;
    debug!(request_id = %request_id, route = answer.route, "ask: done");

    Ok(ApiResponse::success(AskResponse {
        route: answer.route,
        confidence: answer.confidence,
        answer: answer.text,
    })
    .into_response_with_status(StatusCode::OK))
}
