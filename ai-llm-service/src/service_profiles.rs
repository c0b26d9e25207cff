//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Every call is bounded by the profile timeout; overruns surface as
//!   [`AiLlmError::Timeout`].

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    CompletionService, EmbeddingService,
    chat::ChatRequest,
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;

/// Owns the **chat** and **embedding** profiles plus their cached clients.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates the service.
    ///
    /// - `chat`: completion profile used by every answering pipeline.
    /// - `embedding`: encoder shared by the router and the FAQ index.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            chat,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Runs a chat completion on the **chat** profile.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, AiLlmError> {
        let cfg = &self.chat;
        let fut = async {
            match cfg.provider {
                LlmProvider::Ollama => self.ollama_client(cfg).await?.chat(request).await,
                LlmProvider::OpenAI => self.openai_client(cfg).await?.chat(request).await,
            }
        };
        with_timeout(cfg, fut).await
    }

    /// Encodes a batch of texts on the **embedding** profile.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let cfg = &self.embedding;
        let fut = async {
            match cfg.provider {
                LlmProvider::Ollama => self.ollama_client(cfg).await?.embeddings(inputs).await,
                LlmProvider::OpenAI => self.openai_client(cfg).await?.embeddings(inputs).await,
            }
        };
        with_timeout(cfg, fut).await
    }

    /// Health snapshot for every distinct profile.
    ///
    /// When chat and embedding share endpoint and model they are probed once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let same = self.chat.provider == self.embedding.provider
            && self.chat.endpoint == self.embedding.endpoint
            && self.chat.model == self.embedding.model;
        let list = if same {
            vec![("chat+embedding".to_string(), self.chat.clone())]
        } else {
            vec![
                ("chat".to_string(), self.chat.clone()),
                ("embedding".to_string(), self.embedding.clone()),
            ]
        };
        self.health.check_many(&list).await
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn ollama_client(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        debug!(model = %cfg.model, "creating Ollama client");
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn openai_client(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        debug!(model = %cfg.model, "creating OpenAI-compatible client");
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

async fn with_timeout<T>(
    cfg: &LlmModelConfig,
    fut: impl std::future::Future<Output = Result<T, AiLlmError>>,
) -> Result<T, AiLlmError> {
    let limit = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_CALL_TIMEOUT_SECS));
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => {
            warn!(model = %cfg.model, timeout_secs = limit.as_secs(), "LLM call timed out");
            Err(AiLlmError::Timeout(limit))
        }
    }
}

#[async_trait]
impl CompletionService for LlmServiceProfiles {
    async fn complete(&self, request: &ChatRequest) -> crate::Result<String> {
        self.chat(request).await
    }
}

#[async_trait]
impl EmbeddingService for LlmServiceProfiles {
    async fn encode(&self, inputs: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        self.embed_batch(inputs).await
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            timeout_secs: Some(1),
        }
    }

    #[tokio::test]
    async fn clients_are_cached_per_config() {
        let svc = LlmServiceProfiles::new(ollama("qwen3:14b"), ollama("nomic-embed-text"), None)
            .unwrap();
        let a = svc.ollama_client(&svc.chat).await.unwrap();
        let b = svc.ollama_client(&svc.chat).await.unwrap();
        let c = svc.ollama_client(&svc.embedding).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn empty_batch_skips_the_backend() {
        let svc = LlmServiceProfiles::new(ollama("m"), ollama("e"), None).unwrap();
        assert!(svc.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn slow_calls_become_timeouts() {
        let cfg = ollama("m");
        let res: Result<(), AiLlmError> = with_timeout(&cfg, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(res, Err(AiLlmError::Timeout(d)) if d == Duration::from_secs(1)));
    }
}
