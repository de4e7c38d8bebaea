//! Query-side types

use serde::{Deserialize, Serialize};

/// Constraints extracted from a user query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConstraints {
    /// Attribute tokens in reply order (duplicates kept)
    pub attributes: Vec<String>,
    /// Minimum price threshold, inclusive
    pub min_price: Option<f64>,
}

impl QueryConstraints {
    pub fn new(attributes: Vec<String>, min_price: Option<f64>) -> Self {
        Self {
            attributes,
            min_price,
        }
    }

    /// True when neither attributes nor a price threshold were extracted
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.min_price.is_none()
    }
}

/// Nearest-neighbor hit against the in-memory index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Position of the record in the catalog
    pub position: usize,
    /// Cosine similarity score (-1.0 - 1.0)
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(QueryConstraints::default().is_empty());
        assert!(!QueryConstraints::new(vec![], Some(10.0)).is_empty());
        assert!(!QueryConstraints::new(vec!["eco".to_string()], None).is_empty());
    }
}
