use ai_llm_service::health_service::HealthStatus;
use rag_store::IndexGeneration;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// One entry per distinct provider profile.
    pub providers: Vec<HealthStatus>,
    pub faq_index: FaqIndexHealth,
}

#[derive(Debug, Serialize)]
pub struct FaqIndexHealth {
    pub backend: &'static str,
    /// False until the first ingestion finished.
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<IndexGeneration>,
}
