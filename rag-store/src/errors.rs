//! Unified error types for the crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed FAQ export.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// FAQ export lacks a required header.
    #[error("csv header `{0}` not found")]
    MissingColumn(&'static str),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality across records.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding backend failed; propagated unmodified.
    #[error(transparent)]
    Embedding(#[from] AiLlmError),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Retrieval attempted before the first ingestion finished.
    #[error("reference index is not ready: ingestion has not completed")]
    NotReady,
}
