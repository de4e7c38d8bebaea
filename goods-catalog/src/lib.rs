//! Catalog loading, text normalization and attribute matching
//!
//! Builds the in-memory product catalog from a semicolon-delimited listing
//! file and answers attribute/price filters against it.
//!
//! ## Pipeline
//! - [`loader`] reads rows, strips markup and coerces prices
//! - [`normalizer`] lemmatizes descriptions and extracts entities
//! - [`catalog`] assembles the immutable [`Catalog`]
//! - [`matcher`] filters and ranks records for a set of constraints

pub mod catalog;
pub mod error;
pub mod html;
pub mod loader;
pub mod matcher;
pub mod normalizer;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use html::clean_html;
pub use loader::{CatalogLoader, LoadStats, LoadedRows, RawProduct};
pub use matcher::match_products;
pub use normalizer::{NormalizerError, RuleBasedAnalyzer, TextAnalysis, TextAnalyzer};
