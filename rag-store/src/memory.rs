//! In-process [`ReferenceIndex`] with exhaustive similarity search.

use std::collections::HashMap;

use ai_llm_service::similarity::{cosine_similarity, dot};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::{
    config::DistanceKind,
    errors::RagError,
    index::ReferenceIndex,
    record::{FaqHit, IndexedPoint},
};

#[derive(Default)]
struct Collection {
    dim: usize,
    points: Vec<IndexedPoint>,
}

/// Collections kept in memory; adequate for FAQ-sized corpora.
pub struct MemoryIndex {
    distance: DistanceKind,
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryIndex {
    pub fn new(distance: DistanceKind) -> Self {
        Self {
            distance,
            collections: RwLock::new(HashMap::new()),
        }
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.distance {
            DistanceKind::Cosine => cosine_similarity(a, b),
            DistanceKind::Dot => dot(a, b),
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new(DistanceKind::Cosine)
    }
}

fn missing(collection: &str) -> RagError {
    RagError::Config(format!("collection `{collection}` does not exist"))
}

#[async_trait]
impl ReferenceIndex for MemoryIndex {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn exists(&self, collection: &str) -> Result<bool, RagError> {
        Ok(self.collections.read().await.contains_key(collection))
    }

    async fn create(&self, collection: &str, dim: usize) -> Result<(), RagError> {
        let mut map = self.collections.write().await;
        let entry = map.entry(collection.to_string()).or_insert_with(|| Collection {
            dim,
            points: Vec::new(),
        });
        if entry.dim != dim {
            return Err(RagError::VectorSizeMismatch {
                got: dim,
                want: entry.dim,
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str) -> Result<(), RagError> {
        self.collections.write().await.remove(collection);
        Ok(())
    }

    async fn add(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<usize, RagError> {
        let mut map = self.collections.write().await;
        let coll = map.get_mut(collection).ok_or_else(|| missing(collection))?;
        if let Some(bad) = points.iter().find(|p| p.vector.len() != coll.dim) {
            return Err(RagError::VectorSizeMismatch {
                got: bad.vector.len(),
                want: coll.dim,
            });
        }
        let n = points.len();
        // Same id replaces the stored point, like an upsert.
        for p in points {
            match coll.points.iter_mut().find(|q| q.entry.id == p.entry.id) {
                Some(slot) => *slot = p,
                None => coll.points.push(p),
            }
        }
        Ok(n)
    }

    async fn count(&self, collection: &str) -> Result<usize, RagError> {
        let map = self.collections.read().await;
        Ok(map.get(collection).ok_or_else(|| missing(collection))?.points.len())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<FaqHit>, RagError> {
        let map = self.collections.read().await;
        let coll = map.get(collection).ok_or_else(|| missing(collection))?;
        if coll.points.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if vector.len() != coll.dim {
            return Err(RagError::VectorSizeMismatch {
                got: vector.len(),
                want: coll.dim,
            });
        }

        let mut scored: Vec<(f32, &IndexedPoint)> = coll
            .points
            .iter()
            .map(|p| (self.score(vector, &p.vector), p))
            .collect();
        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);
        trace!(collection, hits = scored.len(), "memory query");

        Ok(scored
            .into_iter()
            .map(|(score, p)| FaqHit {
                score,
                entry: p.entry.clone(),
            })
            .collect())
    }
}
