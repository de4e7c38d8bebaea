//! Core types for the product search service
//!
//! This crate defines the shared data structures used across the workspace,
//! including catalog records, parsed query constraints and search hits.

pub mod error;
pub mod product;
pub mod query;

pub use error::{GoodsError, GoodsResult};
pub use product::{Entity, ProductRecord};
pub use query::{QueryConstraints, SearchHit};
