use std::str::FromStr;

use serde::Serialize;

use crate::error_handler::ConfigError;

/// Backend used for completions or embeddings.
///
/// `OpenAI` covers every OpenAI-compatible endpoint (OpenAI itself, Groq,
/// vLLM, ...); the base URL decides which one is actually called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI-compatible REST API.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    /// Accepts the values used in `LLM_KIND` / `EMBEDDING_KIND`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" | "groq" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
