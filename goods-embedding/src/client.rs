//! OpenAI embedding client

use async_openai::{
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::{
    embedder::Embedder,
    error::{EmbeddingError, Result},
    types::EmbeddingVector,
};

/// Largest number of inputs the embeddings endpoint accepts per request
pub const MAX_BATCH_SIZE: usize = 2048;

pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_DIMENSION: usize = 1536;

/// OpenAI embedding client
pub struct EmbeddingClient {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// Uses text-embedding-3-small model (1536 dimensions)
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key))
    }

    /// Create a client from a prepared config (custom API base, org, ...)
    pub fn with_config(config: OpenAIConfig) -> Self {
        Self {
            client: Client::with_config(config),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    /// Use a different embedding model
    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }

    /// Low-level embedding generation for one request
    async fn generate_embeddings(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        // The API rejects empty strings
        let input = texts
            .iter()
            .map(|t| if t.trim().is_empty() { " ".to_string() } else { t.clone() })
            .collect();

        let request = CreateEmbeddingRequest {
            model: self.model.clone(),
            input: EmbeddingInput::StringArray(input),
            encoding_format: None,
            dimensions: None,
            user: None,
        };

        let response = self.client.embeddings().create(request).await?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: response.data.len(),
            });
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        let mut vectors = Vec::with_capacity(data.len());
        for item in data {
            // Validate dimension
            if item.embedding.len() != self.dimension {
                return Err(EmbeddingError::InvalidDimension {
                    expected: self.dimension,
                    actual: item.embedding.len(),
                });
            }
            vectors.push(item.embedding);
        }

        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    #[instrument(skip(self, texts), fields(count = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(MAX_BATCH_SIZE) {
            debug!("Embedding batch of {} texts", chunk.len());
            vectors.extend(self.generate_embeddings(chunk).await?);
        }

        info!(
            "Generated {} embeddings: dimension={}, model={}",
            vectors.len(),
            self.dimension,
            self.model
        );

        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model(&self) -> &str {
        &self.model
    }
}
