//! Connectivity probes for the chat and embedding backends.
//!
//! - Ollama: `GET {endpoint}/api/tags`, then look for the configured model
//! - OpenAI-compatible: `GET {endpoint}/v1/models` with bearer auth, same check
//!
//! [`HealthService::check`] never fails; problems become `ok = false` so the
//! result can be served straight from a `/health` endpoint.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// Health snapshot for one profile.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Which profile was probed (`chat`, `embedding`, `chat+embedding`).
    pub role: String,
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(
        role: &str,
        cfg: &LlmModelConfig,
        ok: bool,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            role: role.to_string(),
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Reuses a single HTTP client for every probe.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// # Errors
    /// [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Probes one profile. Any failure is folded into the returned status.
    pub async fn check(&self, role: &str, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        let probe = match cfg.provider {
            LlmProvider::Ollama => self.probe_ollama(cfg).await,
            LlmProvider::OpenAI => self.probe_openai(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        let status = match probe {
            Ok((true, msg)) => HealthStatus::new(role, cfg, true, latency, msg),
            Ok((false, msg)) => HealthStatus::new(role, cfg, false, latency, msg),
            Err(err) => HealthStatus::new(role, cfg, false, latency, err.to_string()),
        };

        if status.ok {
            info!(
                role,
                provider = %status.provider,
                model = %status.model,
                latency_ms = status.latency_ms,
                "health probe completed"
            );
        } else {
            warn!(
                role,
                provider = %status.provider,
                endpoint = %status.endpoint,
                message = %status.message,
                "health probe failed"
            );
        }
        status
    }

    /// Probes several `(role, config)` pairs sequentially.
    pub async fn check_many(&self, profiles: &[(String, LlmModelConfig)]) -> Vec<HealthStatus> {
        debug!(count = profiles.len(), "running batch health probes");
        let mut out = Vec::with_capacity(profiles.len());
        for (role, cfg) in profiles {
            out.push(self.check(role, cfg).await);
        }
        out
    }

    fn timeout_for(&self, cfg: &LlmModelConfig) -> Duration {
        cfg.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout)
    }

    async fn probe_ollama(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            #[serde(default)]
            models: Vec<Tag>,
        }

        let url = format!("{}/api/tags", cfg.endpoint.trim_end_matches('/'));
        debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .send()
            .await?;
        let resp = ensure_success(resp, url).await?;

        let tags: Tags = resp
            .json()
            .await
            .map_err(|e| HealthError::Decode(format!("/api/tags: {e}")))?;
        // Ollama lists `name:tag`; a bare model name matches its `:latest`.
        let found = tags
            .models
            .iter()
            .any(|m| m.name == cfg.model || m.name == format!("{}:latest", cfg.model));
        Ok(if found {
            (true, "Ollama is healthy; model is available".into())
        } else {
            (false, "Ollama is up, but model not found in /api/tags".into())
        })
    }

    async fn probe_openai(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            #[serde(default)]
            data: Vec<ModelItem>,
        }

        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Decode("missing API key".into()))?;
        let auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| HealthError::Decode(format!("invalid API key header: {e}")))?;

        let url = format!("{}/v1/models", cfg.endpoint.trim_end_matches('/'));
        debug!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .header(header::AUTHORIZATION, auth)
            .send()
            .await?;
        let resp = ensure_success(resp, url).await?;

        let models: Models = resp
            .json()
            .await
            .map_err(|e| HealthError::Decode(format!("/v1/models: {e}")))?;
        Ok(if models.data.iter().any(|m| m.id == cfg.model) {
            (true, "API is healthy; model is available".into())
        } else {
            (false, "API is up, but model not found in /v1/models".into())
        })
    }
}

async fn ensure_success(
    resp: reqwest::Response,
    url: String,
) -> Result<reqwest::Response, AiLlmError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let snippet = make_snippet(&resp.text().await.unwrap_or_default());
    Err(HealthError::HttpStatus(HttpError {
        status,
        url,
        snippet,
    })
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(timeout: Option<u64>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            timeout_secs: timeout,
        }
    }

    #[test]
    fn probe_timeout_never_exceeds_service_default() {
        let svc = HealthService::new(Some(5)).unwrap();
        assert_eq!(svc.timeout_for(&cfg(Some(60))), Duration::from_secs(5));
        assert_eq!(svc.timeout_for(&cfg(Some(2))), Duration::from_secs(2));
        assert_eq!(svc.timeout_for(&cfg(None)), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn missing_key_reports_unhealthy_without_network() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc.check("chat", &cfg(None)).await;
        assert!(!status.ok);
        assert_eq!(status.role, "chat");
        assert!(status.message.contains("missing API key"));
    }
}
