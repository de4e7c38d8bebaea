//! Embeddings and nearest-neighbor lookup for product descriptions
//!
//! Descriptions are turned into fixed-length vectors by an [`Embedder`]
//! (OpenAI's text-embedding-3-small, or all-MiniLM-L6-v2 run locally), held in an
//! in-memory [`EmbeddingIndex`] aligned with catalog positions, and optionally
//! persisted through a [`ProductStore`].
//!
//! ## Features
//! - Batch embedding of catalog descriptions
//! - Cosine similarity with ndarray
//! - Top-K lookup against the in-memory index
//! - SQLite product store with upsert and nearest-K queries

pub mod client;
pub mod embedder;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod hashing;
pub mod index;
pub mod local;
pub mod similarity;
pub mod store;
pub mod types;

pub use client::EmbeddingClient;
pub use embedder::Embedder;
pub use error::{EmbeddingError, Result};
#[cfg(any(test, feature = "test-support"))]
pub use hashing::HashingEmbedder;
pub use index::{EmbeddingIndex, DEFAULT_TOP_K};
pub use local::{LocalEmbedder, LOCAL_DIMENSION, LOCAL_MODEL};
pub use similarity::{cosine_similarity, rank_by_similarity};
pub use store::{ProductStore, SqliteProductStore};
pub use types::{EmbeddingVector, StoredMatch, StoredProduct};
