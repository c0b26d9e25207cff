//! Batched embedding with bounded concurrency and dimension checks.

use ai_llm_service::EmbeddingService;
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::errors::RagError;

/// Embeds `texts` in batches of `batch` with up to `concurrency` requests in flight.
///
/// Output order matches input order. Every vector must have the same length;
/// a provider returning a short batch or a vector of a different size is an
/// error.
pub async fn embed_texts(
    embedder: &dyn EmbeddingService,
    texts: &[String],
    batch: usize,
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Result<Vec<Vec<f32>>, RagError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let batch = batch.max(1);
    info!(
        total = texts.len(),
        batch,
        concurrency, "embedding reference texts"
    );

    let chunks: Vec<Vec<Vec<f32>>> = stream::iter(texts.chunks(batch))
        .map(|chunk| async move {
            let out = embedder.encode(chunk).await?;
            if out.len() != chunk.len() {
                return Err(RagError::VectorSizeMismatch {
                    got: out.len(),
                    want: chunk.len(),
                });
            }
            if let Some(pb) = progress {
                pb.inc(chunk.len() as u64);
            }
            Ok::<_, RagError>(out)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let vectors: Vec<Vec<f32>> = chunks.into_iter().flatten().collect();
    let dim = vectors.first().map(Vec::len).unwrap_or_default();
    if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
        return Err(RagError::VectorSizeMismatch {
            got: bad.len(),
            want: dim,
        });
    }

    debug!(vectors = vectors.len(), dim, "embedding finished");
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::testing::{FailingEmbedder, HashingEmbedder};
    use async_trait::async_trait;

    #[tokio::test]
    async fn preserves_order_across_batches() {
        let texts: Vec<String> = (0..7).map(|i| format!("question number {i}")).collect();
        let out = embed_texts(&HashingEmbedder, &texts, 3, 2, None).await.unwrap();
        assert_eq!(out.len(), 7);
        for (t, v) in texts.iter().zip(&out) {
            assert_eq!(v, &HashingEmbedder::vector(t));
        }
    }

    struct Ragged;

    #[async_trait]
    impl EmbeddingService for Ragged {
        async fn encode(&self, inputs: &[String]) -> ai_llm_service::Result<Vec<Vec<f32>>> {
            Ok(inputs
                .iter()
                .map(|t| vec![1.0; t.len().min(3) + 1])
                .collect())
        }
    }

    #[tokio::test]
    async fn rejects_inconsistent_dimensions() {
        let texts = vec!["a".to_string(), "abcdef".to_string()];
        let err = embed_texts(&Ragged, &texts, 8, 1, None).await.unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { .. }));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let texts = vec!["a".to_string()];
        let err = embed_texts(&FailingEmbedder, &texts, 8, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }
}
