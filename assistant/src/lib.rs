//! Query dispatcher.
//!
//! Classifies each query with the intent router and hands it to the matching
//! pipeline:
//!
//! | route        | handler                                                   |
//! |--------------|-----------------------------------------------------------|
//! | `faq`        | grounded FAQ answer ([`contextor::Contextor`])            |
//! | `sql`        | catalog answer ([`sql_pipeline::SqlPipeline`]) as a table |
//! | `small_talk` | one-sentence reply ([`SmallTalk`])                        |
//! | none         | fixed "not implemented" notice                            |

mod config;
mod error;
pub mod formatter;
mod small_talk;

pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use formatter::{ProductRow, ResponseFormatter};
pub use small_talk::{PERSONA_PROMPT, SmallTalk};

use std::sync::Arc;

use ai_llm_service::CompletionService;
use contextor::Contextor;
use intent_router::{IntentRouter, RouteName, RoutedIntent};
use serde::Serialize;
use sql_pipeline::SqlPipeline;
use tracing::{debug, info, instrument};

pub const UNROUTED_NOTICE: &str = "Route none not implemented yet";

/// Dispatcher output: the routing decision and the rendered answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub route: &'static str,
    pub confidence: f32,
    pub text: String,
}

pub struct Assistant {
    router: IntentRouter,
    faq: Contextor,
    sql: SqlPipeline,
    small_talk: SmallTalk,
    formatter: ResponseFormatter,
}

impl Assistant {
    /// # Errors
    /// [`AssistantError::Config`] if the link pattern built from
    /// `cfg.domain_marker` does not compile.
    pub fn new(
        router: IntentRouter,
        faq: Contextor,
        sql: SqlPipeline,
        llm: Arc<dyn CompletionService>,
        cfg: AssistantConfig,
    ) -> Result<Self> {
        Ok(Self {
            router,
            faq,
            sql,
            small_talk: SmallTalk::new(llm, cfg.small_talk_temperature),
            formatter: ResponseFormatter::new(&cfg.domain_marker)?,
        })
    }

    /// Routes `query` and answers it.
    ///
    /// # Errors
    /// Embedding and completion failures, and [`contextor::ContextorError::NotReady`]
    /// for FAQ questions before ingestion.
    #[instrument(skip_all)]
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let intent = self.router.classify(query).await?;
        let text = self.dispatch(intent, query).await?;
        info!(route = intent.name(), confidence = intent.confidence, "query answered");
        Ok(Answer {
            route: intent.name(),
            confidence: intent.confidence,
            text,
        })
    }

    async fn dispatch(&self, intent: RoutedIntent, query: &str) -> Result<String> {
        let Some(route) = intent.route else {
            return Ok(UNROUTED_NOTICE.to_string());
        };
        match route {
            RouteName::Faq => Ok(self.faq.answer_faq(query).await?),
            RouteName::Sql => {
                let raw = self.sql.answer_structured(query).await?;
                if self.formatter.has_product_lines(&raw) {
                    Ok(self.formatter.format(&raw))
                } else {
                    debug!("no product lines, passing catalog answer through");
                    Ok(raw)
                }
            }
            RouteName::SmallTalk => Ok(self.small_talk.reply(query).await?),
        }
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::testing::{HashingEmbedder, ScriptedCompletion};
    use async_trait::async_trait;
    use contextor::{ContextorConfig, ContextorError};
    use intent_router::RouterConfig;
    use rag_store::{FaqEntry, RagConfig, RagStore};
    use serde_json::{Map, Value, json};
    use sql_pipeline::{CatalogStore, ResultSet, SqlConfig, UNSAFE_QUERY_APOLOGY};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogStore for FakeCatalog {
        async fn query(
            &self,
            _statement: &str,
            _max_rows: usize,
        ) -> sql_pipeline::Result<ResultSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Value::Object(row) = json!({"brand": "Puma", "title": "Velocity Nitro"}) else {
                unreachable!()
            };
            let rows: Vec<Map<String, Value>> = vec![row];
            Ok(ResultSet {
                columns: vec!["brand".into(), "title".into()],
                rows,
                truncated: false,
            })
        }
    }

    struct Harness {
        assistant: Assistant,
        llm: Arc<ScriptedCompletion>,
        catalog: Arc<FakeCatalog>,
    }

    async fn harness(replies: &[&str], ingest: bool) -> Harness {
        let embedder = Arc::new(HashingEmbedder);
        let store = Arc::new(RagStore::from_config(RagConfig::default(), embedder.clone()).unwrap());
        if ingest {
            store
                .ingest_rows(vec![FaqEntry {
                    id: "id_0".into(),
                    question: "What is your cancellation policy?".into(),
                    answer: "Orders can be cancelled before shipping.".into(),
                }])
                .await
                .unwrap();
        }
        let llm = Arc::new(ScriptedCompletion::new(replies.iter().copied()));
        let catalog = Arc::new(FakeCatalog::default());

        let router = IntentRouter::with_default_routes(embedder, RouterConfig::default())
            .await
            .unwrap();
        let faq = Contextor::new(store, llm.clone(), ContextorConfig::default());
        let sql = SqlPipeline::new(llm.clone(), catalog.clone(), SqlConfig::default());
        let assistant =
            Assistant::new(router, faq, sql, llm.clone(), AssistantConfig::default()).unwrap();
        Harness {
            assistant,
            llm,
            catalog,
        }
    }

    #[tokio::test]
    async fn faq_questions_get_grounded_answers() {
        let h = harness(&["Orders can be cancelled before shipping."], true).await;
        let a = h.assistant.answer("What is your cancellation policy?").await.unwrap();
        assert_eq!(a.route, "faq");
        assert_eq!(a.text, "Orders can be cancelled before shipping.");
        assert!(h.llm.requests()[0].user_prompt().unwrap().contains("### CONTEXT:"));
    }

    #[tokio::test]
    async fn catalog_questions_are_rendered_as_tables() {
        let h = harness(
            &[
                "<SQL>SELECT * FROM product WHERE LOWER(brand) LIKE LOWER('%puma%')</SQL>",
                "1. Puma Velocity Nitro (Men): Rs. 2000 (50 percent off), Rating: 4.1, https://www.myntra.com/2, 2024-05-02T18:30:00",
            ],
            false,
        )
        .await;
        let a = h.assistant.answer("Are there any Puma shoes on sale?").await.unwrap();
        assert_eq!(a.route, "sql");
        assert!(a.text.contains("| Puma Velocity Nitro | Rs. 2000 | 50% | 4.1 | May 02, 2024 06:30 PM |"));
        assert!(a.text.contains("1. https://www.myntra.com/2"));
        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn scalar_catalog_answers_pass_through() {
        let h = harness(
            &[
                "<SQL>SELECT * FROM product</SQL>",
                "The most expensive shoe on sale costs Rs.21499.",
            ],
            false,
        )
        .await;
        let a = h
            .assistant
            .answer("What is the price of the most expensive shoes that you have on sale?")
            .await
            .unwrap();
        assert_eq!(a.route, "sql");
        assert_eq!(a.text, "The most expensive shoe on sale costs Rs.21499.");
    }

    #[tokio::test]
    async fn destructive_statement_never_reaches_the_catalog() {
        let h = harness(&["<SQL>DROP TABLE product;</SQL>"], false).await;
        let a = h.assistant.answer("Are there any Puma shoes on sale?").await.unwrap();
        assert_eq!(a.route, "sql");
        assert_eq!(a.text, UNSAFE_QUERY_APOLOGY);
        assert_eq!(h.catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn small_talk_and_unrouted_queries() {
        let h = harness(&["I'm doing great."], false).await;
        let a = h.assistant.answer("How are you?").await.unwrap();
        assert_eq!(a.route, "small_talk");
        assert_eq!(a.text, "I'm doing great.");

        let none = h.assistant.answer("xyzzy plugh").await.unwrap();
        assert_eq!(none.route, "none");
        assert_eq!(none.text, UNROUTED_NOTICE);
        assert_eq!(h.llm.calls(), 1);
    }

    #[tokio::test]
    async fn faq_before_ingestion_is_not_ready() {
        let h = harness(&[], false).await;
        let err = h
            .assistant
            .answer("What is your cancellation policy?")
            .await
            .unwrap_err();
        assert!(err.is_not_ready());
        assert!(matches!(err, AssistantError::Faq(ContextorError::NotReady)));
    }

    #[tokio::test]
    async fn completion_failures_surface() {
        let h = harness(&[], false).await;
        assert!(matches!(
            h.assistant.answer("How are you?").await,
            Err(AssistantError::Llm(_))
        ));
    }
}
