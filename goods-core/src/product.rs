//! Catalog record types

use serde::{Deserialize, Serialize};

/// Named entity found in a product description
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Surface text as it appears in the description
    pub text: String,
    /// Entity label (MONEY, PERCENT, QUANTITY, CARDINAL, ORG)
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// A single product listing after load-time cleaning
///
/// Records are built once from a catalog row and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Source identifier (the ID column)
    pub id: String,
    /// Product title, never empty
    pub title: String,
    /// Raw description as found in the source, markup included
    pub description: String,
    /// Description with markup stripped and whitespace collapsed
    pub cleaned_description: String,
    /// Lemmatized description without stop words or punctuation
    pub normalized_description: String,
    pub vendor: String,
    /// Product type, lower-cased and trimmed (empty when absent)
    pub product_type: String,
    /// Tags, lower-cased and trimmed, in source order
    pub tags: Vec<String>,
    /// Price, absent when the source value was not a valid number
    pub price: Option<f64>,
    /// Distinct (text, label) pairs in order of first appearance
    pub entities: Vec<Entity>,
}

impl ProductRecord {
    /// Whether every attribute appears verbatim in the tag list
    pub fn has_all_tags(&self, attributes: &[String]) -> bool {
        attributes.iter().all(|attr| self.tags.contains(attr))
    }

    /// Whether the product type contains any attribute, ignoring case
    pub fn type_contains_any(&self, attributes: &[String]) -> bool {
        if self.product_type.is_empty() {
            return false;
        }
        let product_type = self.product_type.to_lowercase();
        attributes
            .iter()
            .any(|attr| product_type.contains(&attr.to_lowercase()))
    }

    /// Price rendered for chat responses
    pub fn display_price(&self) -> String {
        match self.price {
            Some(price) => format!("{:.2}", price),
            None => "n/a".to_string(),
        }
    }
}
