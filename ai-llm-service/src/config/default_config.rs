//! Profile configs loaded strictly from environment variables.
//!
//! Two roles are resolved:
//!
//! - **Chat** → completion model used by every answering pipeline
//! - **Embedding** → encoder shared by the intent router and the FAQ index
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = `openai` (default; any OpenAI-compatible API such as Groq) or `ollama`
//! - `LLM_MODEL` = chat model (mandatory)
//! - `LLM_API_KEY` = bearer token (mandatory for `openai`)
//! - `LLM_MAX_TOKENS` = optional generation cap (u32)
//! - `LLM_TIMEOUT_SECS` = per-request timeout (u64, default 60)
//!
//! Endpoints:
//! - `OPENAI_URL` = OpenAI-compatible base (default `https://api.openai.com`)
//! - `OLLAMA_URL` or `OLLAMA_PORT` = Ollama endpoint (mandatory for `ollama`)
//!
//! Embedding:
//! - `EMBEDDING_KIND` = provider for embeddings (defaults to `LLM_KIND`)
//! - `EMBEDDING_MODEL` = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, EnvLookup, env_opt, env_opt_u32, env_opt_u64, must_env,
        process_env,
    },
};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint(env: EnvLookup<'_>) -> Result<String, AiLlmError> {
    if let Some(url) = env_opt(env, "OLLAMA_URL") {
        return Ok(url.trim().to_string());
    }
    if let Some(port) = env_opt(env, "OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn provider_from(env: EnvLookup<'_>, var: &'static str) -> Result<Option<LlmProvider>, AiLlmError> {
    match env_opt(env, var) {
        Some(kind) => Ok(Some(kind.parse::<LlmProvider>()?)),
        None => Ok(None),
    }
}

fn endpoint_and_key(
    env: EnvLookup<'_>,
    provider: LlmProvider,
) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok((ollama_endpoint(env)?, None)),
        LlmProvider::OpenAI => {
            let endpoint =
                env_opt(env, "OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
            let key = must_env(env, "LLM_API_KEY")?;
            Ok((endpoint.trim().to_string(), Some(key)))
        }
    }
}

/// Builds the **chat** profile from an arbitrary variable source.
///
/// # Defaults
/// - `temperature = None` (each pipeline sends its own)
/// - `timeout_secs = 60`
pub fn config_chat_from(env: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from(env, "LLM_KIND")?.unwrap_or(LlmProvider::OpenAI);
    let model = must_env(env, "LLM_MODEL")?;
    let (endpoint, api_key) = endpoint_and_key(env, provider)?;

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: env_opt_u32(env, "LLM_MAX_TOKENS")?,
        temperature: None,
        timeout_secs: Some(env_opt_u64(env, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the **embedding** profile from an arbitrary variable source.
///
/// # Defaults
/// - provider = `EMBEDDING_KIND`, else `LLM_KIND`, else OpenAI-compatible
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = 30` unless `LLM_TIMEOUT_SECS` is set
pub fn config_embedding_from(env: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = match provider_from(env, "EMBEDDING_KIND")? {
        Some(p) => p,
        None => provider_from(env, "LLM_KIND")?.unwrap_or(LlmProvider::OpenAI),
    };
    let model = must_env(env, "EMBEDDING_MODEL")?;
    let (endpoint, api_key) = endpoint_and_key(env, provider)?;

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: Some(0.0),
        timeout_secs: Some(env_opt_u64(env, "LLM_TIMEOUT_SECS")?.unwrap_or(30)),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Chat profile from the process environment.
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    config_chat_from(&process_env)
}

/// Embedding profile from the process environment.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    config_embedding_from(&process_env)
}
