use ai_llm_service::AiLlmError;
use contextor::ContextorError;
use intent_router::RouterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant config error: {0}")]
    Config(String),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Faq(#[from] ContextorError),

    /// Completion backend failed on the catalog or small-talk path.
    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

impl AssistantError {
    /// The FAQ index has not been ingested yet.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, AssistantError::Faq(ContextorError::NotReady))
    }
}

impl From<regex::Error> for AssistantError {
    fn from(e: regex::Error) -> Self {
        AssistantError::Config(format!("invalid link pattern: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
