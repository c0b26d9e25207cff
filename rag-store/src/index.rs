//! Reference-index abstraction.
//!
//! Implement [`ReferenceIndex`] to plug in another vector store. Collections are
//! addressed by name; a collection is created with a fixed dimension and then
//! only grows until it is deleted.

use async_trait::async_trait;

use crate::{
    errors::RagError,
    record::{FaqHit, IndexedPoint},
};

/// Named vector collections holding FAQ entries.
#[async_trait]
pub trait ReferenceIndex: Send + Sync {
    /// Short backend name for logs and `/health`.
    fn backend(&self) -> &'static str;

    async fn exists(&self, collection: &str) -> Result<bool, RagError>;

    /// Creates the collection, or keeps the existing one (create-or-get).
    async fn create(&self, collection: &str, dim: usize) -> Result<(), RagError>;

    /// Drops the collection. Deleting a missing collection is not an error.
    async fn delete(&self, collection: &str) -> Result<(), RagError>;

    /// Adds points; returns how many were stored.
    async fn add(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<usize, RagError>;

    async fn count(&self, collection: &str) -> Result<usize, RagError>;

    /// Top-`top_k` entries by similarity, best first.
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<FaqHit>, RagError>;
}
