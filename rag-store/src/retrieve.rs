//! Retrieval: embed the query, rank the collection.

use ai_llm_service::EmbeddingService;
use tracing::trace;

use crate::{
    errors::RagError,
    index::ReferenceIndex,
    record::{FaqHit, IndexGeneration},
};

/// Top-`top_k` entries of the given generation for `query`, best first.
///
/// An empty generation yields no hits without touching the embedder.
pub(crate) async fn nearest(
    index: &dyn ReferenceIndex,
    embedder: &dyn EmbeddingService,
    generation: &IndexGeneration,
    query: &str,
    top_k: usize,
) -> Result<Vec<FaqHit>, RagError> {
    if generation.size == 0 || top_k == 0 {
        trace!(collection = %generation.collection, "empty generation, no hits");
        return Ok(Vec::new());
    }

    let qv = embedder.encode_one(query).await?;
    let hits = index.query(&generation.collection, &qv, top_k).await?;

    trace!(
        collection = %generation.collection,
        top_k,
        hits = hits.len(),
        best = hits.first().map(|h| h.score),
        "retrieve::nearest"
    );
    Ok(hits)
}
