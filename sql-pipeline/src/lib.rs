//! Structured query pipeline over the product catalog.
//!
//! `GENERATE → EXTRACT → VALIDATE → EXECUTE → SUMMARIZE`:
//! the model writes one tagged `SELECT`, the statement is pulled out of the
//! tags and checked, run against the read-only catalog, and the rows are
//! summarized by a second completion.
//!
//! Pipeline failures (no statement, unsafe statement, execution error) end in a
//! fixed apology; completion failures are returned to the caller.

mod catalog;
mod config;
mod error;
mod extract;
pub mod prompt;
mod validate;

pub use catalog::{CatalogRecord, CatalogStore, Gender, ResultSet, SqliteCatalog};
pub use config::SqlConfig;
pub use error::{
    EXECUTION_APOLOGY, NO_QUERY_APOLOGY, Result, SqlError, Stage, UNSAFE_QUERY_APOLOGY,
};
pub use extract::{GeneratedQuery, extract_statement};
pub use validate::validate_read_only;

use std::sync::Arc;

use ai_llm_service::{AiLlmError, ChatRequest, CompletionService};
use tracing::{debug, info, instrument, warn};

pub struct SqlPipeline {
    llm: Arc<dyn CompletionService>,
    catalog: Arc<dyn CatalogStore>,
    cfg: SqlConfig,
}

impl SqlPipeline {
    pub fn new(llm: Arc<dyn CompletionService>, catalog: Arc<dyn CatalogStore>, cfg: SqlConfig) -> Self {
        Self { llm, catalog, cfg }
    }

    /// Pipeline over the SQLite file named in `cfg`.
    pub fn with_sqlite(llm: Arc<dyn CompletionService>, cfg: SqlConfig) -> Self {
        let catalog = Arc::new(SqliteCatalog::new(cfg.db_path.clone()));
        Self::new(llm, catalog, cfg)
    }

    /// Answers a catalog question in prose.
    ///
    /// # Errors
    /// Only completion backend failures; every other failure is answered with
    /// its apology.
    pub async fn answer_structured(&self, question: &str) -> std::result::Result<String, AiLlmError> {
        match self.run(question).await {
            Ok(text) => Ok(text),
            Err(SqlError::Llm(e)) => Err(e),
            Err(e) => Ok(e.apology().unwrap_or_default().to_string()),
        }
    }

    /// Runs every stage and surfaces the failure that stopped it.
    #[instrument(skip_all)]
    pub async fn run(&self, question: &str) -> Result<String> {
        let generated = self
            .generate(question)
            .await
            .map_err(|e| stopped(Stage::Generate, e))?;

        let statement = generated
            .statement()
            .map_err(|e| stopped(Stage::Extract, e))?;
        let statement = validate_read_only(statement).map_err(|e| stopped(Stage::Validate, e))?;
        info!(%statement, "statement accepted");

        let rs = self
            .catalog
            .query(statement, self.cfg.max_rows)
            .await
            .map_err(|e| stopped(Stage::Execute, e))?;
        if rs.truncated {
            warn!(kept = rs.rows.len(), "result set truncated before summarization");
        }

        self.summarize(question, &rs)
            .await
            .map_err(|e| stopped(Stage::Summarize, e))
    }

    async fn generate(&self, question: &str) -> Result<GeneratedQuery> {
        let request = ChatRequest::system_user(prompt::GENERATION_PROMPT, question)
            .with_temperature(self.cfg.temperature);
        let raw = self.llm.complete(&request).await?;
        let generated = GeneratedQuery::parse(raw);
        debug!(regions = generated.regions, "generation reply parsed");
        Ok(generated)
    }

    async fn summarize(&self, question: &str, rs: &ResultSet) -> Result<String> {
        let shape = if rs.is_empty() {
            "empty"
        } else if rs.has_record_shape() {
            "products"
        } else {
            "values"
        };
        debug!(rows = rs.rows.len(), shape, "summarizing result set");

        let request = ChatRequest::system_user(
            prompt::SUMMARY_PROMPT,
            prompt::summary_user_prompt(question, &rs.rows),
        )
        .with_temperature(self.cfg.temperature);
        let text = self.llm.complete(&request).await?;
        info!(answer_len = text.len(), "structured answer ready");
        Ok(text)
    }

    pub fn config(&self) -> &SqlConfig {
        &self.cfg
    }
}

fn stopped(stage: Stage, err: SqlError) -> SqlError {
    warn!(%stage, error = %err, "structured query stopped");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::testing::ScriptedCompletion;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and delegates to SQLite.
    struct Counting {
        inner: SqliteCatalog,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogStore for Counting {
        async fn query(&self, statement: &str, max_rows: usize) -> Result<ResultSet> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.query(statement, max_rows).await
        }
    }

    fn setup(
        replies: &[&str],
        cfg: SqlConfig,
    ) -> (tempfile::TempDir, Arc<ScriptedCompletion>, Arc<Counting>, SqlPipeline) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Arc::new(Counting {
            inner: SqliteCatalog::new(catalog::fixture::catalog(dir.path())),
            calls: AtomicUsize::new(0),
        });
        let llm = Arc::new(ScriptedCompletion::new(replies.iter().copied()));
        let pipeline = SqlPipeline::new(llm.clone(), catalog.clone(), cfg);
        (dir, llm, catalog, pipeline)
    }

    #[tokio::test]
    async fn runs_every_stage() {
        let summary = "1. Puma Velocity Nitro (Men): Rs. 2000 (50 percent off), Rating: 4.1, https://www.myntra.com/p/2, 2024-05-01T10:00:00";
        let (_dir, llm, catalog, p) = setup(
            &[
                "<SQL>\nSELECT * FROM product WHERE LOWER(brand) LIKE LOWER('%puma%')\n</SQL>",
                summary,
            ],
            SqlConfig::default(),
        );

        let out = p.answer_structured("Are there any Puma shoes on sale?").await.unwrap();
        assert_eq!(out, summary);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);

        let reqs = llm.requests();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].user_prompt(), Some("Are there any Puma shoes on sale?"));
        assert_eq!(reqs[0].temperature, Some(0.2));
        let data = reqs[1].user_prompt().unwrap();
        assert!(data.starts_with("QUESTION: Are there any Puma shoes on sale?. DATA: [{\"title\":\"Velocity Nitro\""));
        assert!(!data.contains("Nike"));
    }

    #[tokio::test]
    async fn missing_tags_apologize_without_touching_the_catalog() {
        let (_dir, llm, catalog, p) = setup(&["SELECT * FROM product"], SqlConfig::default());
        let out = p.answer_structured("cheap shoes?").await.unwrap();
        assert_eq!(out, NO_QUERY_APOLOGY);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn drop_table_is_rejected_before_execution() {
        let (_dir, _llm, catalog, p) = setup(&["<SQL>DROP TABLE product;</SQL>"], SqlConfig::default());
        let err = p.run("delete everything").await.unwrap_err();
        assert!(matches!(err, SqlError::UnsafeQuery(_)));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unsafe_statement_answers_with_apology() {
        let (_dir, _llm, _catalog, p) =
            setup(&["<SQL>UPDATE product SET mrp = 0</SQL>"], SqlConfig::default());
        assert_eq!(p.answer_structured("x").await.unwrap(), UNSAFE_QUERY_APOLOGY);
    }

    #[tokio::test]
    async fn execution_errors_hide_backend_detail() {
        let (_dir, llm, _catalog, p) =
            setup(&["<SQL>SELECT * FROM sneakers</SQL>"], SqlConfig::default());
        let out = p.answer_structured("x").await.unwrap();
        assert_eq!(out, EXECUTION_APOLOGY);
        assert!(!out.contains("sneakers"));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn empty_result_is_still_summarized() {
        let (_dir, llm, _catalog, p) = setup(
            &[
                "<SQL>SELECT * FROM product WHERE LOWER(brand) LIKE LOWER('%reebok%')</SQL>",
                "There are no Reebok shoes right now.",
            ],
            SqlConfig::default(),
        );
        let out = p.answer_structured("reebok?").await.unwrap();
        assert_eq!(out, "There are no Reebok shoes right now.");
        assert!(llm.requests()[1].user_prompt().unwrap().ends_with("DATA: []"));
    }

    #[tokio::test]
    async fn rows_are_capped() {
        let cfg = SqlConfig {
            max_rows: 1,
            ..SqlConfig::default()
        };
        let (_dir, llm, _catalog, p) = setup(
            &["<SQL>SELECT * FROM product ORDER BY mrp</SQL>", "ok"],
            cfg,
        );
        p.answer_structured("all shoes").await.unwrap();
        let data = llm.requests()[1].user_prompt().unwrap().to_string();
        assert_eq!(data.matches("\"title\"").count(), 1);
    }

    #[tokio::test]
    async fn completion_failures_propagate() {
        let (_dir, _llm, catalog, p) = setup(&[], SqlConfig::default());
        assert!(p.answer_structured("x").await.is_err());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);

        let (_dir, _llm, _catalog, p) = setup(&["<SQL>SELECT * FROM product</SQL>"], SqlConfig::default());
        assert!(matches!(p.run("x").await, Err(SqlError::Llm(_))));
    }
}
