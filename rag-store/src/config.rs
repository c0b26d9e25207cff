//! Runtime and collection configuration.

use std::str::FromStr;

use crate::errors::RagError;

/// Scoring function for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
}

/// Where the reference collection lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexBackend {
    /// In-process collection, rebuilt on every start.
    Memory,
    /// Remote Qdrant collection.
    Qdrant,
}

impl FromStr for IndexBackend {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "qdrant" => Ok(Self::Qdrant),
            other => Err(RagError::Config(format!("unknown RAG_BACKEND `{other}`"))),
        }
    }
}

/// Configuration for FAQ ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    pub backend: IndexBackend,
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    pub distance: DistanceKind,
    /// Texts per embedding request.
    pub embed_batch: usize,
    /// Embedding requests in flight during ingestion.
    pub embed_concurrency: usize,
    /// Points per add/upsert call (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag for Qdrant (false = HNSW ANN).
    pub exact_search: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            backend: IndexBackend::Memory,
            qdrant_url: "http://127.0.0.1:6334".into(),
            qdrant_api_key: None,
            collection: "faqs".into(),
            distance: DistanceKind::Cosine,
            embed_batch: 32,
            embed_concurrency: 4,
            upsert_batch: 256,
            exact_search: true,
        }
    }
}

impl RagConfig {
    /// Reads `RAG_BACKEND`, `QDRANT_URL`, `QDRANT_API_KEY`, `RAG_COLLECTION`,
    /// `RAG_EMBED_BATCH` and `RAG_UPSERT_BATCH` through `env`.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, RagError> {
        let get = |k: &str| env(k).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(b) = get("RAG_BACKEND") {
            cfg.backend = b.parse()?;
        }
        if let Some(url) = get("QDRANT_URL") {
            cfg.qdrant_url = url.trim().to_string();
        }
        cfg.qdrant_api_key = get("QDRANT_API_KEY");
        if let Some(c) = get("RAG_COLLECTION") {
            cfg.collection = c.trim().to_string();
        }
        if let Some(n) = get("RAG_EMBED_BATCH") {
            cfg.embed_batch = parse_usize("RAG_EMBED_BATCH", &n)?;
        }
        if let Some(n) = get("RAG_UPSERT_BATCH") {
            cfg.upsert_batch = parse_usize("RAG_UPSERT_BATCH", &n)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Same as [`RagConfig::from_lookup`] over the process environment.
    pub fn from_env() -> Result<Self, RagError> {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.backend == IndexBackend::Qdrant && self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 || self.embed_batch == 0 {
            return Err(RagError::Config("batch sizes must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_usize(var: &str, raw: &str) -> Result<usize, RagError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| RagError::Config(format!("{var} must be a positive integer, got `{raw}`")))
}
