//! Embedding model abstraction

use async_trait::async_trait;

use crate::error::{EmbeddingError, Result};
use crate::types::EmbeddingVector;

/// Text embedding model
///
/// Implementations return vectors of exactly [`Embedder::dimension`] floats,
/// one per input text and in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        if vectors.len() != 1 {
            return Err(EmbeddingError::CountMismatch {
                expected: 1,
                actual: vectors.len(),
            });
        }
        Ok(vectors.remove(0))
    }

    /// Length of every vector this model produces
    fn dimension(&self) -> usize;

    /// Model identifier
    fn model(&self) -> &str;
}
