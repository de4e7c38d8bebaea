//! Core types for embeddings

use goods_core::{Entity, ProductRecord};
use serde::{Deserialize, Serialize};

/// Embedding vector (1536 dimensions for text-embedding-3-small)
pub type EmbeddingVector = Vec<f32>;

/// A product as persisted in the store, with its description embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProduct {
    /// Product identifier, the store key
    pub id: String,
    pub title: String,
    /// Cleaned description text
    pub description: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub price: Option<f64>,
    pub normalized_description: String,
    pub entities: Vec<Entity>,
    /// Embedding of the normalized description
    pub embedding: EmbeddingVector,
}

impl StoredProduct {
    /// Build the stored form of a catalog record
    pub fn from_record(record: &ProductRecord, embedding: EmbeddingVector) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.cleaned_description.clone(),
            vendor: record.vendor.clone(),
            product_type: record.product_type.clone(),
            tags: record.tags.clone(),
            price: record.price,
            normalized_description: record.normalized_description.clone(),
            entities: record.entities.clone(),
            embedding,
        }
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }

    /// Price rendered for chat responses
    pub fn display_price(&self) -> String {
        match self.price {
            Some(price) => format!("{:.2}", price),
            None => "n/a".to_string(),
        }
    }
}

/// Nearest-neighbor result from a [`crate::ProductStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub product: StoredProduct,
    /// Cosine similarity score (-1.0 - 1.0)
    pub score: f32,
}
