//! Error types for catalog operations

use thiserror::Error;

use crate::normalizer::NormalizerError;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog is missing required column: {0}")]
    MissingColumn(String),

    #[error("Text analysis failed: {0}")]
    Normalizer(#[from] NormalizerError),
}
