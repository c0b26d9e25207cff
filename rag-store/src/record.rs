//! Core data models used by the library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One FAQ row. The question is what gets embedded; the answer rides along.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// `id_<row index>`, unique within a collection generation.
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// An entry together with its embedding, ready to be added to an index.
#[derive(Clone, Debug)]
pub struct IndexedPoint {
    pub entry: FaqEntry,
    pub vector: Vec<f32>,
}

/// A single retrieval hit, best first.
#[derive(Clone, Debug, Serialize)]
pub struct FaqHit {
    pub score: f32,
    pub entry: FaqEntry,
}

/// Snapshot of the last completed ingestion.
#[derive(Clone, Debug, Serialize)]
pub struct IndexGeneration {
    pub collection: String,
    pub size: usize,
    /// `None` when the source had no rows.
    pub dim: Option<usize>,
    pub built_at: DateTime<Utc>,
}
