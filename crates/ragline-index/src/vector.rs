//! In-memory vector index with cosine-similarity search.
//!
//! Built once from the full chunk set. Either empty (no documents) or fully
//! populated — an embedding failure aborts the build rather than leaving a
//! partial index.

use ndarray::Array1;
use serde::Serialize;
use tracing::info;

use ragline_core::{Error, Result};
use ragline_ingest::Chunk;

use crate::embedder::EmbeddingBackend;

/// Retriever default: number of chunks returned per query.
pub const DEFAULT_TOP_K: usize = 4;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// In-memory similarity-searchable chunk index.
pub struct VectorIndex {
    entries: Vec<(Chunk, Array1<f32>)>,
}

impl VectorIndex {
    /// An index with no entries; answers every query with an empty result.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-k most similar chunks for a query embedding, descending score.
    pub fn search(&self, query: &Array1<f32>, k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = a.dot(a).sqrt();
    let norm_b = b.dot(b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    a.dot(b) / (norm_a * norm_b)
}

/// Embed every chunk and build the index.
///
/// An empty chunk set yields an empty, queryable index without touching the
/// backend.
pub async fn build_index(
    chunks: Vec<Chunk>,
    backend: &dyn EmbeddingBackend,
) -> Result<VectorIndex> {
    if chunks.is_empty() {
        info!("No chunks to index; starting with an empty index");
        return Ok(VectorIndex::empty());
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = backend.embed_batch(&texts).await?;

    if embeddings.len() != chunks.len() {
        return Err(Error::Inference(format!(
            "embedded {} of {} chunks",
            embeddings.len(),
            chunks.len()
        )));
    }

    let entries: Vec<(Chunk, Array1<f32>)> = chunks.into_iter().zip(embeddings).collect();
    info!(
        "Built vector index with {} chunks (model {})",
        entries.len(),
        backend.model()
    );
    Ok(VectorIndex { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ndarray::array;
    use std::path::PathBuf;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            text: text.into(),
            source: PathBuf::from("test.pdf"),
            chunk_index: 0,
        }
    }

    /// Stub backend: maps each text to a fixed axis-aligned vector.
    struct AxisEmbedder;

    #[async_trait]
    impl EmbeddingBackend for AxisEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Array1<f32>>> {
            Ok(texts
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    let mut v = Array1::zeros(4);
                    v[i % 4] = 1.0;
                    v
                })
                .collect())
        }

        fn model(&self) -> &str {
            "stub-axis"
        }
    }

    #[test]
    fn empty_index_answers_with_empty_context() {
        let index = VectorIndex::empty();
        let results = index.search(&array![1.0, 0.0], DEFAULT_TOP_K);
        assert!(results.is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn search_orders_by_similarity() {
        let index = VectorIndex {
            entries: vec![
                (chunk("orthogonal"), array![0.0, 1.0]),
                (chunk("aligned"), array![1.0, 0.0]),
                (chunk("diagonal"), array![1.0, 1.0]),
            ],
        };
        let results = index.search(&array![1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "aligned");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[1].chunk.text, "diagonal");
    }

    #[test]
    fn zero_norm_query_scores_zero() {
        let index = VectorIndex {
            entries: vec![(chunk("a"), array![1.0, 0.0])],
        };
        let results = index.search(&array![0.0, 0.0], 1);
        assert_eq!(results[0].score, 0.0);
    }

    #[tokio::test]
    async fn build_index_from_empty_chunks_is_empty_not_error() {
        let index = build_index(Vec::new(), &AxisEmbedder).await.unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn build_index_embeds_every_chunk() {
        let chunks = vec![chunk("one"), chunk("two"), chunk("three")];
        let index = build_index(chunks, &AxisEmbedder).await.unwrap();
        assert_eq!(index.len(), 3);
    }
}
