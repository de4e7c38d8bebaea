//! Error types for embedding operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("Local embedding model error: {0}")]
    LocalModel(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Product {0:?} has no id")]
    MissingId(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<EmbeddingError> for goods_core::GoodsError {
    fn from(err: EmbeddingError) -> Self {
        use goods_core::GoodsError;
        match err {
            EmbeddingError::OpenAI(e) => GoodsError::api(e.to_string()),
            EmbeddingError::Database(msg) => GoodsError::Database(msg),
            EmbeddingError::NotFound(id) => GoodsError::NotFound(id),
            EmbeddingError::Config(msg) => GoodsError::Config(msg),
            other => GoodsError::internal(other.to_string()),
        }
    }
}
