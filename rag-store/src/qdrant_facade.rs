//! [`ReferenceIndex`] over Qdrant.
//!
//! Concentrates every `qdrant-client` call behind the index trait so the rest
//! of the crate never sees the builder API.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointId, PointStruct,
    SearchParamsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value as QValue,
    VectorParamsBuilder, value::Kind,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::{DistanceKind, RagConfig},
    errors::RagError,
    index::ReferenceIndex,
    record::{FaqEntry, FaqHit, IndexedPoint},
};

/// A facade over the Qdrant client.
pub struct QdrantIndex {
    client: Qdrant,
    distance: DistanceKind,
    exact: bool,
}

impl QdrantIndex {
    /// Connects lazily; the first RPC surfaces connectivity problems.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder.build().map_err(qerr)?;

        Ok(Self {
            client,
            distance: cfg.distance,
            exact: cfg.exact_search,
        })
    }
}

fn qerr(e: impl std::fmt::Display) -> RagError {
    RagError::Qdrant(e.to_string())
}

/// Deterministic point id for an entry id (UUIDv5, URL namespace).
pub fn point_id(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(Kind::StringValue(s.to_string())),
    }
}

fn payload_of(entry: &FaqEntry) -> HashMap<String, QValue> {
    HashMap::from([
        ("id".to_string(), qstring(&entry.id)),
        ("question".to_string(), qstring(&entry.question)),
        ("answer".to_string(), qstring(&entry.answer)),
    ])
}

fn entry_of(payload: &HashMap<String, QValue>) -> Option<FaqEntry> {
    let text = |k: &str| match payload.get(k).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    };
    Some(FaqEntry {
        id: text("id")?,
        question: text("question").unwrap_or_default(),
        answer: text("answer")?,
    })
}

#[async_trait]
impl ReferenceIndex for QdrantIndex {
    fn backend(&self) -> &'static str {
        "qdrant"
    }

    async fn exists(&self, collection: &str) -> Result<bool, RagError> {
        self.client.collection_exists(collection).await.map_err(qerr)
    }

    async fn create(&self, collection: &str, dim: usize) -> Result<(), RagError> {
        if self.exists(collection).await? {
            debug!(collection, "collection already exists");
            return Ok(());
        }
        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
        };
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(dim as u64, distance)),
            )
            .await
            .map_err(qerr)?;
        info!(collection, dim, "collection created");
        Ok(())
    }

    async fn delete(&self, collection: &str) -> Result<(), RagError> {
        if !self.exists(collection).await? {
            return Ok(());
        }
        self.client
            .delete_collection(collection)
            .await
            .map_err(qerr)?;
        info!(collection, "collection deleted");
        Ok(())
    }

    async fn add(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<usize, RagError> {
        if points.is_empty() {
            return Ok(0);
        }
        let n = points.len();
        let pts: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let id: PointId = point_id(&p.entry.id).to_string().into();
                PointStruct {
                    id: Some(id),
                    payload: payload_of(&p.entry),
                    vectors: Some(p.vector.into()),
                    ..Default::default()
                }
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, pts).wait(true))
            .await
            .map_err(qerr)?;
        debug!(collection, points = n, "points upserted");
        Ok(n)
    }

    async fn count(&self, collection: &str) -> Result<usize, RagError> {
        let res = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
            .map_err(qerr)?;
        Ok(res.result.map(|r| r.count as usize).unwrap_or_default())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<FaqHit>, RagError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let mut builder = SearchPointsBuilder::new(collection, vector.to_vec(), top_k as u64)
            .with_payload(true);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }
        let res = self.client.search_points(builder).await.map_err(qerr)?;

        Ok(res
            .result
            .into_iter()
            .filter_map(|p| {
                entry_of(&p.payload).map(|entry| FaqHit {
                    score: p.score,
                    entry,
                })
            })
            .collect())
    }
}
