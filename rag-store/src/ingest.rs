//! Rebuild pipeline: rows → batched embeddings → fresh collection → batched adds.
//!
//! A rebuild replaces the collection wholesale in two phases. [`embed_rows`]
//! touches only the embedder, so its failure leaves the previous generation in
//! place. [`replace`] drops the old collection first; once it fails the
//! collection may be empty or partial.

use ai_llm_service::EmbeddingService;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::{
    config::RagConfig,
    embed::embed_texts,
    errors::RagError,
    index::ReferenceIndex,
    record::{FaqEntry, IndexGeneration, IndexedPoint},
};

fn progress_bar(len: usize, label: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message(label);
    pb
}

/// Embeds every question, pairing each row with its vector in input order.
pub(crate) async fn embed_rows(
    cfg: &RagConfig,
    embedder: &dyn EmbeddingService,
    rows: Vec<FaqEntry>,
) -> Result<Vec<IndexedPoint>, RagError> {
    info!(collection = %cfg.collection, rows = rows.len(), "embedding FAQ questions");
    let questions: Vec<String> = rows.iter().map(|r| r.question.clone()).collect();
    let pb = progress_bar(questions.len(), "embedding");
    let vectors = embed_texts(
        embedder,
        &questions,
        cfg.embed_batch,
        cfg.embed_concurrency,
        Some(&pb),
    )
    .await?;
    pb.finish_and_clear();

    Ok(rows
        .into_iter()
        .zip(vectors)
        .map(|(entry, vector)| IndexedPoint { entry, vector })
        .collect())
}

/// Replaces `cfg.collection` with exactly `points`.
pub(crate) async fn replace(
    cfg: &RagConfig,
    index: &dyn ReferenceIndex,
    points: Vec<IndexedPoint>,
) -> Result<IndexGeneration, RagError> {
    let collection = cfg.collection.as_str();
    info!(
        collection,
        backend = index.backend(),
        points = points.len(),
        "rebuilding reference collection"
    );

    if index.exists(collection).await? {
        info!(collection, "dropping existing collection before rebuild");
        index.delete(collection).await?;
    }

    let Some(dim) = points.first().map(|p| p.vector.len()) else {
        warn!(collection, "FAQ source is empty; collection left empty");
        return Ok(IndexGeneration {
            collection: collection.to_string(),
            size: 0,
            dim: None,
            built_at: Utc::now(),
        });
    };
    index.create(collection, dim).await?;

    let total = points.len();
    let pb = progress_bar(total, "indexing");
    let mut batch = Vec::with_capacity(cfg.upsert_batch.min(total));
    let mut added = 0usize;
    for p in points {
        batch.push(p);
        if batch.len() == cfg.upsert_batch {
            added += index.add(collection, std::mem::take(&mut batch)).await?;
            pb.set_position(added as u64);
        }
    }
    if !batch.is_empty() {
        added += index.add(collection, batch).await?;
    }
    pb.finish_and_clear();

    let size = index.count(collection).await?;
    if size != added {
        warn!(collection, added, size, "index count differs from rows added");
    }

    info!(collection, size, dim, "reference collection ready");
    Ok(IndexGeneration {
        collection: collection.to_string(),
        size,
        dim: Some(dim),
        built_at: Utc::now(),
    })
}
