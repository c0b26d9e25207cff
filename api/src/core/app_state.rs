use std::sync::Arc;

use ai_llm_service::service_profiles::LlmServiceProfiles;
use assistant::Assistant;
use rag_store::RagStore;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    /// Probed by `/health`.
    pub llm_profiles: Arc<LlmServiceProfiles>,
    /// FAQ index, reported by `/health`.
    pub store: Arc<RagStore>,
}

impl AppState {
    pub fn new(
        assistant: Arc<Assistant>,
        llm_profiles: Arc<LlmServiceProfiles>,
        store: Arc<RagStore>,
    ) -> Self {
        Self {
            assistant,
            llm_profiles,
            store,
        }
    }
}
