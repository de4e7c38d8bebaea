//! Loading the catalog into a product store

use std::collections::HashSet;

use goods_catalog::Catalog;
use goods_embedding::{EmbeddingIndex, ProductStore, StoredProduct};
use tracing::{error, info, instrument, warn};

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub inserted: usize,
    /// Records whose id was already stored earlier in the same load
    pub skipped: usize,
    pub failed: usize,
}

/// Upsert every catalog record with its embedding
///
/// The store is keyed by product id, so only the first record with a given
/// id is written. A failed record is logged and counted; the load carries on.
#[instrument(skip_all, fields(records = catalog.len()))]
pub fn load_into_store(
    catalog: &Catalog,
    index: &EmbeddingIndex,
    store: &dyn ProductStore,
) -> LoadReport {
    let mut report = LoadReport::default();
    let mut seen = HashSet::new();

    for (position, record) in catalog.iter().enumerate() {
        if !record.id.trim().is_empty() && !seen.insert(record.id.as_str()) {
            warn!(
                "Skipping product {:?} at position {}: id {} already stored",
                record.title, position, record.id
            );
            report.skipped += 1;
            continue;
        }

        let Some(vector) = index.vector(position) else {
            error!("No embedding for product {} at position {}", record.id, position);
            report.failed += 1;
            continue;
        };

        let product = StoredProduct::from_record(record, vector.to_vec());
        match store.upsert_record(&product) {
            Ok(()) => report.inserted += 1,
            Err(e) => {
                error!("Failed to store product {}: {}", record.id, e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Loaded {} products into store ({} duplicate ids skipped, {} failed)",
        report.inserted, report.skipped, report.failed
    );
    report
}
