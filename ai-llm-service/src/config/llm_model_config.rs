use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32};

/// Configuration for one model profile (chat or embedding).
///
/// # Fields
///
/// - `provider`: backend (Ollama or OpenAI-compatible).
/// - `model`: model identifier (e.g. `"llama-3.3-70b-versatile"`, `"nomic-embed-text"`).
/// - `endpoint`: base URL; provider paths are appended by the clients.
/// - `api_key`: bearer token for OpenAI-compatible providers.
/// - `max_tokens`: generation cap, if supported.
/// - `temperature`: default sampling temperature; requests may override it.
/// - `timeout_secs`: per-request timeout in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Checks the invariants every client relies on.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyModel`] for a blank model id
    /// - [`ConfigError::InvalidFormat`] for a non-http(s) endpoint
    /// - [`ConfigError::MissingApiKey`] for OpenAI-compatible configs without a key
    /// - [`ConfigError::OutOfRange`] for a temperature outside `0.0..=2.0`
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", &self.endpoint)?;
        if self.provider == LlmProvider::OpenAI && self.api_key.is_none() {
            return Err(ConfigError::MissingApiKey(self.provider).into());
        }
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        Ok(())
    }
}
