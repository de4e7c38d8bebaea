//! In-memory embedding index aligned with catalog positions

use goods_core::SearchHit;
use tracing::{info, instrument};

use crate::{
    embedder::Embedder,
    error::{EmbeddingError, Result},
    similarity::rank_by_similarity,
    types::EmbeddingVector,
};

/// Number of neighbors returned when the caller has no preference
pub const DEFAULT_TOP_K: usize = 5;

/// One vector per catalog record, in catalog order
///
/// Built once at startup; there is no incremental update.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    vectors: Vec<EmbeddingVector>,
    dimension: usize,
    model: String,
}

impl EmbeddingIndex {
    /// Embed every text in one batch
    ///
    /// Fails unless the embedder returns exactly one vector per text.
    #[instrument(skip(texts, embedder), fields(count = texts.len(), model = embedder.model()))]
    pub async fn build(texts: &[String], embedder: &dyn Embedder) -> Result<Self> {
        let vectors = embedder.embed_batch(texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let index = Self::from_vectors(vectors, embedder.dimension(), embedder.model())?;
        info!(
            "Built embedding index: {} vectors, dimension={}",
            index.len(),
            index.dimension
        );
        Ok(index)
    }

    /// Wrap precomputed vectors, checking that all have `dimension` entries
    pub fn from_vectors(
        vectors: Vec<EmbeddingVector>,
        dimension: usize,
        model: impl Into<String>,
    ) -> Result<Self> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(EmbeddingError::InvalidDimension {
                expected: dimension,
                actual: bad.len(),
            });
        }

        Ok(Self {
            vectors,
            dimension,
            model: model.into(),
        })
    }

    /// Up to `k` closest records by cosine score, ties by catalog position
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(EmbeddingError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        Ok(rank_by_similarity(query, &self.vectors, k))
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        self.vectors.get(position).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::hashing::HashingEmbedder;

    /// Embedder that drops the last text
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model(&self) -> &str {
            "short"
        }
    }

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_build_one_vector_per_text() {
        let embedder = HashingEmbedder::default();
        let index = EmbeddingIndex::build(&texts(&["soap bar", "lotion", "candle"]), &embedder)
            .await
            .unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), 384);
        assert_eq!(index.model(), "fnv-hashing");
    }

    #[tokio::test]
    async fn test_build_rejects_count_mismatch() {
        let result = EmbeddingIndex::build(&texts(&["a", "b"]), &ShortEmbedder).await;
        assert!(matches!(
            result,
            Err(EmbeddingError::CountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[tokio::test]
    async fn test_nearest_finds_matching_description() {
        let embedder = HashingEmbedder::default();
        let index = EmbeddingIndex::build(
            &texts(&["steel garden shovel", "organic hydrate lotion", "scented candle"]),
            &embedder,
        )
        .await
        .unwrap();

        let query = embedder.embed_text("lotion organic");
        let hits = index.nearest(&query, DEFAULT_TOP_K).unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].position, 1);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_nearest_limits_and_orders() {
        let index = EmbeddingIndex::from_vectors(
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            2,
            "test",
        )
        .unwrap();

        let hits = index.nearest(&[1.0, 0.0], 2).unwrap();
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn test_query_dimension_checked() {
        let index = EmbeddingIndex::from_vectors(vec![vec![1.0, 0.0]], 2, "test").unwrap();
        assert!(matches!(
            index.nearest(&[1.0, 0.0, 0.0], 1),
            Err(EmbeddingError::InvalidDimension { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_from_vectors_rejects_ragged_input() {
        let result = EmbeddingIndex::from_vectors(vec![vec![1.0, 0.0], vec![1.0]], 2, "test");
        assert!(result.is_err());
    }
}
