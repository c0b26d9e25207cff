//! Grounded FAQ answering.
//!
//! Public API: [`Contextor::answer_faq`]. It retrieves the top-K reference
//! answers from `rag-store`, concatenates them best-first into a context block,
//! asks the completion backend to answer strictly from that block and returns
//! the completion text verbatim.

mod api_types;
mod cfg;
mod error;
pub mod prompt;

pub use api_types::{FaqAnswer, UsedEntry};
pub use cfg::ContextorConfig;
pub use error::ContextorError;

use std::sync::Arc;

use ai_llm_service::{ChatRequest, CompletionService};
use rag_store::RagStore;
use tracing::{debug, info, instrument};

/// FAQ engine over a shared reference store and completion backend.
pub struct Contextor {
    store: Arc<RagStore>,
    llm: Arc<dyn CompletionService>,
    cfg: ContextorConfig,
}

impl Contextor {
    pub fn new(
        store: Arc<RagStore>,
        llm: Arc<dyn CompletionService>,
        cfg: ContextorConfig,
    ) -> Self {
        Self { store, llm, cfg }
    }

    /// Answers `question` from the FAQ index.
    ///
    /// An empty index is not an error: the model gets an empty context and is
    /// expected to reply with [`prompt::DONT_KNOW`].
    ///
    /// # Errors
    /// - [`ContextorError::NotReady`] before ingestion completed
    /// - [`ContextorError::Llm`] when embedding or completion fails
    pub async fn answer_faq(&self, question: &str) -> Result<String, ContextorError> {
        Ok(self.answer_faq_with_context(question).await?.answer)
    }

    /// Like [`Contextor::answer_faq`], also returning the entries fed to the model.
    #[instrument(skip_all, fields(top_k = self.cfg.top_k))]
    pub async fn answer_faq_with_context(
        &self,
        question: &str,
    ) -> Result<FaqAnswer, ContextorError> {
        let hits = self.store.nearest(question, self.cfg.top_k).await?;
        debug!(
            hits = hits.len(),
            ids = ?hits.iter().map(|h| h.entry.id.as_str()).collect::<Vec<_>>(),
            "faq context retrieved"
        );

        let mut request =
            ChatRequest::system_user(prompt::system_prompt(), prompt::build_user_prompt(question, &hits));
        request.temperature = self.cfg.temperature;

        let answer = self.llm.complete(&request).await?;
        info!(answer_len = answer.len(), "faq answered");

        let context = hits
            .into_iter()
            .map(|h| UsedEntry {
                score: h.score,
                id: h.entry.id,
                question: h.entry.question,
                answer: h.entry.answer,
            })
            .collect();

        Ok(FaqAnswer { answer, context })
    }
}
