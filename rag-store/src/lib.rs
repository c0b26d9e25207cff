//! FAQ reference index: ingestion + retrieval.
//!
//! This crate provides a small API to:
//! - Rebuild a named collection from a FAQ export (CSV) with batched embeddings
//! - Retrieve the top-K nearest entries for a textual query
//!
//! Backends implement [`ReferenceIndex`]: [`MemoryIndex`] (default) and
//! [`QdrantIndex`].

mod config;
mod embed;
mod errors;
mod index;
mod ingest;
mod io_csv;
mod memory;
mod qdrant_facade;
mod record;
mod retrieve;

use std::{path::Path, sync::Arc};

pub use config::{DistanceKind, IndexBackend, RagConfig};
pub use embed::embed_texts;
pub use errors::RagError;
pub use index::ReferenceIndex;
pub use io_csv::{read_faq_csv, read_faq_from};
pub use memory::MemoryIndex;
pub use qdrant_facade::QdrantIndex;
pub use record::{FaqEntry, FaqHit, IndexGeneration, IndexedPoint};

use ai_llm_service::EmbeddingService;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// High-level facade that wires configuration, index and embedder.
///
/// Ingestion holds the write lock for its whole run; retrieval takes the read
/// lock. Readers therefore never see a half-built collection, and concurrent
/// ingestions run one after the other.
pub struct RagStore {
    cfg: RagConfig,
    index: Arc<dyn ReferenceIndex>,
    embedder: Arc<dyn EmbeddingService>,
    generation: RwLock<Option<IndexGeneration>>,
}

impl RagStore {
    pub fn new(
        cfg: RagConfig,
        index: Arc<dyn ReferenceIndex>,
        embedder: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            cfg,
            index,
            embedder,
            generation: RwLock::new(None),
        }
    }

    /// Builds the backend selected by `cfg.backend`.
    ///
    /// # Errors
    /// `RagError::Config` / `RagError::Qdrant` if the backend cannot be set up.
    pub fn from_config(
        cfg: RagConfig,
        embedder: Arc<dyn EmbeddingService>,
    ) -> Result<Self, RagError> {
        cfg.validate()?;
        let index: Arc<dyn ReferenceIndex> = match cfg.backend {
            IndexBackend::Memory => Arc::new(MemoryIndex::new(cfg.distance)),
            IndexBackend::Qdrant => Arc::new(QdrantIndex::new(&cfg)?),
        };
        debug!(backend = index.backend(), collection = %cfg.collection, "RagStore created");
        Ok(Self::new(cfg, index, embedder))
    }

    /// Rebuilds the collection from a CSV export with `QUESTION`/`ANSWER` columns.
    ///
    /// # Errors
    /// I/O and CSV errors, embedding failures, index failures.
    pub async fn ingest_file(&self, path: impl AsRef<Path>) -> Result<IndexGeneration, RagError> {
        info!(path = ?path.as_ref(), "ingesting FAQ export");
        let rows = read_faq_csv(path)?;
        self.ingest_rows(rows).await
    }

    /// Replaces the collection with exactly `rows`.
    ///
    /// Running it twice over the same rows yields the same collection size and
    /// ids, never an accumulation. An embedding failure keeps the previous
    /// generation; an index failure during the rebuild clears it, so lookups
    /// answer [`RagError::NotReady`] until the next successful ingestion.
    pub async fn ingest_rows(&self, rows: Vec<FaqEntry>) -> Result<IndexGeneration, RagError> {
        let mut slot = self.generation.write().await;
        let points = ingest::embed_rows(&self.cfg, self.embedder.as_ref(), rows).await?;
        match ingest::replace(&self.cfg, self.index.as_ref(), points).await {
            Ok(generation) => {
                *slot = Some(generation.clone());
                Ok(generation)
            }
            Err(e) => {
                warn!(error = %e, collection = %self.cfg.collection, "rebuild failed; FAQ index marked not ready");
                *slot = None;
                Err(e)
            }
        }
    }

    /// Top-`top_k` entries for `query`, best first.
    ///
    /// # Errors
    /// [`RagError::NotReady`] before the first ingestion completed; embedding
    /// and index failures otherwise.
    pub async fn nearest(&self, query: &str, top_k: usize) -> Result<Vec<FaqHit>, RagError> {
        let slot = self.generation.read().await;
        let generation = slot.as_ref().ok_or(RagError::NotReady)?;
        retrieve::nearest(
            self.index.as_ref(),
            self.embedder.as_ref(),
            generation,
            query,
            top_k,
        )
        .await
    }

    /// The last completed generation, if any.
    pub async fn generation(&self) -> Option<IndexGeneration> {
        self.generation.read().await.clone()
    }

    pub fn backend(&self) -> &'static str {
        self.index.backend()
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::testing::{FailingEmbedder, HashingEmbedder};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn rows() -> Vec<FaqEntry> {
        [
            ("What is your return policy?", "Returns within 30 days."),
            ("How do I cancel my order?", "Cancel from the orders page before shipping."),
            ("Do you ship internationally?", "We ship within India only."),
        ]
        .iter()
        .enumerate()
        .map(|(i, (q, a))| FaqEntry {
            id: format!("id_{i}"),
            question: q.to_string(),
            answer: a.to_string(),
        })
        .collect()
    }

    fn store() -> RagStore {
        RagStore::from_config(RagConfig::default(), Arc::new(HashingEmbedder)).unwrap()
    }

    #[tokio::test]
    async fn nearest_before_ingestion_is_not_ready() {
        let s = store();
        assert!(matches!(s.nearest("hi", 2).await, Err(RagError::NotReady)));
    }

    #[tokio::test]
    async fn reingestion_replaces_instead_of_accumulating() {
        let s = store();
        let g1 = s.ingest_rows(rows()).await.unwrap();
        let g2 = s.ingest_rows(rows()).await.unwrap();
        assert_eq!(g1.size, 3);
        assert_eq!(g2.size, 3);
        assert_eq!(s.index.count("faqs").await.unwrap(), 3);

        let hits = s.nearest("cancel order", 3).await.unwrap();
        let mut ids: Vec<_> = hits.iter().map(|h| h.entry.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), hits.len());
    }

    #[tokio::test]
    async fn nearest_returns_top_k_best_first() {
        let s = store();
        s.ingest_rows(rows()).await.unwrap();
        let hits = s.nearest("How can I cancel my order?", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.id, "id_1");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn empty_source_gives_empty_hits() {
        let s = store();
        let g = s.ingest_rows(Vec::new()).await.unwrap();
        assert_eq!(g.size, 0);
        assert_eq!(g.dim, None);
        assert!(s.nearest("anything", 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_previous_generation() {
        let index: Arc<dyn ReferenceIndex> = Arc::new(MemoryIndex::default());
        let good = RagStore::new(RagConfig::default(), index.clone(), Arc::new(HashingEmbedder));
        good.ingest_rows(rows()).await.unwrap();

        let bad = RagStore::new(RagConfig::default(), index.clone(), Arc::new(FailingEmbedder));
        assert!(bad.ingest_rows(rows()).await.is_err());
        assert_eq!(index.count("faqs").await.unwrap(), 3);
        assert!(bad.generation().await.is_none());
    }

    /// Memory index whose `add` starts failing once armed.
    struct FlakyIndex {
        inner: MemoryIndex,
        fail_adds: AtomicBool,
    }

    #[async_trait]
    impl ReferenceIndex for FlakyIndex {
        fn backend(&self) -> &'static str {
            "flaky"
        }
        async fn exists(&self, collection: &str) -> Result<bool, RagError> {
            self.inner.exists(collection).await
        }
        async fn create(&self, collection: &str, dim: usize) -> Result<(), RagError> {
            self.inner.create(collection, dim).await
        }
        async fn delete(&self, collection: &str) -> Result<(), RagError> {
            self.inner.delete(collection).await
        }
        async fn add(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<usize, RagError> {
            if self.fail_adds.load(Ordering::SeqCst) {
                return Err(RagError::Qdrant("upsert rejected".into()));
            }
            self.inner.add(collection, points).await
        }
        async fn count(&self, collection: &str) -> Result<usize, RagError> {
            self.inner.count(collection).await
        }
        async fn query(
            &self,
            collection: &str,
            vector: &[f32],
            top_k: usize,
        ) -> Result<Vec<FaqHit>, RagError> {
            self.inner.query(collection, vector, top_k).await
        }
    }

    #[tokio::test]
    async fn index_failure_mid_rebuild_marks_store_not_ready() {
        let index = Arc::new(FlakyIndex {
            inner: MemoryIndex::default(),
            fail_adds: AtomicBool::new(false),
        });
        let s = RagStore::new(RagConfig::default(), index.clone(), Arc::new(HashingEmbedder));
        s.ingest_rows(rows()).await.unwrap();
        assert!(s.generation().await.is_some());

        index.fail_adds.store(true, Ordering::SeqCst);
        assert!(s.ingest_rows(rows()).await.is_err());
        assert!(s.generation().await.is_none());
        assert!(matches!(s.nearest("cancel order", 2).await, Err(RagError::NotReady)));

        index.fail_adds.store(false, Ordering::SeqCst);
        assert_eq!(s.ingest_rows(rows()).await.unwrap().size, 3);
        assert_eq!(s.nearest("cancel order", 2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn ingest_file_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.csv");
        std::fs::write(
            &path,
            "QUESTION,ANSWER\nWhat is your cancellation policy?,Orders can be cancelled before dispatch.\n",
        )
        .unwrap();
        let s = store();
        let g = s.ingest_file(&path).await.unwrap();
        assert_eq!(g.size, 1);
        let hits = s.nearest("cancellation policy", 2).await.unwrap();
        assert_eq!(hits[0].entry.answer, "Orders can be cancelled before dispatch.");
    }
}
