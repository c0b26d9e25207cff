//! Typed error for the contextor crate.

use ai_llm_service::AiLlmError;
use rag_store::RagError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// A question arrived before the FAQ index was built.
    #[error("FAQ index is not ready yet")]
    NotReady,

    /// Errors from the underlying rag-store crate.
    #[error("RAG error: {0}")]
    Rag(RagError),

    /// Completion or embedding backend failure.
    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

impl From<RagError> for ContextorError {
    fn from(e: RagError) -> Self {
        match e {
            RagError::NotReady => ContextorError::NotReady,
            RagError::Embedding(inner) => ContextorError::Llm(inner),
            other => ContextorError::Rag(other),
        }
    }
}
