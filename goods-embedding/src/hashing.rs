//! Deterministic feature-hashing embedder for tests
//!
//! Bag-of-words vectors with no model download or network access, so ranking
//! tests get stable scores. Only compiled for tests and the `test-support`
//! feature. Each lower-cased word is hashed into one of `dimension` buckets with a
//! hash-derived sign, and the result is L2-normalized.

use std::hash::Hasher;

use async_trait::async_trait;
use fnv::FnvHasher;

use crate::{
    embedder::Embedder,
    error::{EmbeddingError, Result},
    types::EmbeddingVector,
};

pub const DEFAULT_HASHING_DIMENSION: usize = 384;

const MODEL_NAME: &str = "fnv-hashing";

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
        }
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(EmbeddingError::Config(
                "Hashing embedder dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    /// Embed one text synchronously
    pub fn embed_text(&self, text: &str) -> EmbeddingVector {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text
            .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
            .filter(|w| w.chars().any(char::is_alphanumeric))
        {
            let mut hasher = FnvHasher::default();
            hasher.write(word.to_lowercase().as_bytes());
            let hash = hasher.finish();

            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }

        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model(&self) -> &str {
        MODEL_NAME
    }
}
