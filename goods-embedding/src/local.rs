//! Local sentence-embedding model via fastembed
//!
//! Runs all-MiniLM-L6-v2 through ONNX Runtime, no API key needed. The model
//! files are downloaded into the cache directory on first use.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use crate::{
    embedder::Embedder,
    error::{EmbeddingError, Result},
    types::EmbeddingVector,
};

pub const LOCAL_MODEL: &str = "all-MiniLM-L6-v2";
pub const LOCAL_DIMENSION: usize = 384;

/// Texts per ONNX inference call
const BATCH_SIZE: usize = 256;

/// all-MiniLM-L6-v2 sentence embeddings computed in-process
#[derive(Clone)]
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedder {
    /// Load the model, downloading it into `cache_dir` if missing
    #[instrument(skip(cache_dir))]
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::LocalModel(e.to_string()))?;
        info!("Loaded local embedding model {}", LOCAL_MODEL);

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let model = Arc::clone(&self.model);
        let input = texts.to_vec();

        // Inference is CPU-bound
        let vectors = tokio::task::spawn_blocking(move || {
            model
                .lock()
                .embed(input, Some(BATCH_SIZE))
                .map_err(|e| EmbeddingError::LocalModel(e.to_string()))
        })
        .await
        .map_err(|e| EmbeddingError::LocalModel(format!("Embedding task failed: {}", e)))??;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != LOCAL_DIMENSION) {
            return Err(EmbeddingError::InvalidDimension {
                expected: LOCAL_DIMENSION,
                actual: bad.len(),
            });
        }

        debug!("Embedded {} texts locally", vectors.len());
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        LOCAL_DIMENSION
    }

    fn model(&self) -> &str {
        LOCAL_MODEL
    }
}
