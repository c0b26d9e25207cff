//! Shared completion + embedding layer for the shoe assistant.
//!
//! - [`service_profiles::LlmServiceProfiles`] owns a `chat` and an `embedding`
//!   profile and implements both seams below.
//! - [`CompletionService`] / [`EmbeddingService`] are the object-safe traits the
//!   pipelines depend on, so tests and tenants can inject their own backends.
//! - Provider clients live under [`services`] (Ollama, OpenAI-compatible).
//!
//! Construct the profiles once, wrap them in `Arc`, and hand clones to dependents.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod similarity;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

use async_trait::async_trait;

pub use chat::{ChatMessage, ChatRequest, ChatRole};
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, Result};

/// Text-completion backend.
///
/// Implementations must not retry on their own; failures surface as
/// [`AiLlmError`] and the caller decides what to do with them.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Runs one non-streaming completion for the given ordered messages.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// Text-embedding backend.
///
/// Must be deterministic for identical input and model version.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Encodes every input into one vector, preserving input order.
    async fn encode(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Convenience wrapper for a single text.
    async fn encode_one(&self, input: &str) -> Result<Vec<f32>> {
        let batch = [input.to_string()];
        let mut out = self.encode(&batch).await?;
        out.pop()
            .ok_or(AiLlmError::EmptyResponse("embedding response contained no vectors"))
    }
}
