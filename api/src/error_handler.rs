use assistant::AssistantError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("The FAQ knowledge base is still loading, please try again shortly.")]
    NotReady,

    /// Completion or embedding backend failed. The detail is logged, never returned.
    #[error("The language service is currently unavailable, please try again later.")]
    Upstream,

    #[error("Something went wrong while answering your question.")]
    Internal,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream => StatusCode::BAD_GATEWAY,
            AppError::MissingEnv(_) | AppError::Bind(_) | AppError::Server(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotReady => "NOT_READY",
            AppError::Upstream => "LLM_UNAVAILABLE",
            AppError::Internal => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        if err.is_not_ready() {
            return AppError::NotReady;
        }
        error!(error = %err, "query failed");
        match err {
            AssistantError::Config(_) => AppError::Internal,
            _ => AppError::Upstream,
        }
    }
}
