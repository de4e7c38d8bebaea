//! Immutable in-memory product catalog

use std::path::Path;

use goods_core::ProductRecord;
use tracing::info;

use crate::error::Result;
use crate::loader::{CatalogLoader, RawProduct};
use crate::normalizer::TextAnalyzer;

/// Product records built once at startup and shared read-only
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    /// Normalize loaded rows into records
    ///
    /// Any analyzer failure aborts the build.
    pub fn build(rows: Vec<RawProduct>, analyzer: &dyn TextAnalyzer) -> Result<Self> {
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let analysis = analyzer.analyze(&row.cleaned_description)?;
            records.push(ProductRecord {
                id: row.id,
                title: row.title,
                description: row.description,
                cleaned_description: row.cleaned_description,
                normalized_description: analysis.normalized,
                vendor: row.vendor,
                product_type: row.product_type,
                tags: row.tags,
                price: row.price,
                entities: analysis.entities,
            });
        }

        Ok(Self::from_records(records))
    }

    /// Wrap already-built records, dropping any with an empty cleaned description
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        let records = records
            .into_iter()
            .filter(|r| !r.cleaned_description.trim().is_empty())
            .collect();
        Self { records }
    }

    /// Load and normalize a catalog file in one step
    pub fn load<P: AsRef<Path>>(path: P, analyzer: &dyn TextAnalyzer) -> Result<Self> {
        let loaded = CatalogLoader::new().load_path(path)?;
        let catalog = Self::build(loaded.products, analyzer)?;
        info!("Catalog ready with {} records", catalog.len());
        Ok(catalog)
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ProductRecord> {
        self.records.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    /// Normalized descriptions in catalog order, the input for embedding
    pub fn normalized_descriptions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.normalized_description.clone())
            .collect()
    }
}
