use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// Route table or router settings are unusable (startup only).
    #[error("router config error: {0}")]
    Config(String),

    /// Embedding backend failed; propagated without retry.
    #[error(transparent)]
    Embedding(#[from] AiLlmError),
}

pub type Result<T> = std::result::Result<T, RouterError>;
