//! Catalog file loading
//!
//! Reads the delimited listing export into typed rows. Cleaning happens here,
//! normalization happens later in [`crate::Catalog::build`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, instrument};

use crate::error::{CatalogError, Result};
use crate::html::clean_html;

/// Columns every catalog file must provide
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "ID",
    "Title",
    "Description",
    "Vendor",
    "Type",
    "Tags",
    "Price",
];

/// A loaded row before linguistic normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawProduct {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cleaned_description: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub price: Option<f64>,
}

/// Row counts from a single load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub loaded: usize,
    pub missing_title: usize,
    pub empty_description: usize,
}

/// Result of loading a catalog file
#[derive(Debug, Clone, Default)]
pub struct LoadedRows {
    pub products: Vec<RawProduct>,
    pub stats: LoadStats,
}

/// Reader for delimited product listing files
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    delimiter: u8,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self { delimiter: b';' }
    }
}

/// Positions of the required columns within the header row
struct ColumnIndex {
    id: usize,
    title: usize,
    description: usize,
    vendor: usize,
    product_type: usize,
    tags: usize,
    price: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| CatalogError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            id: position(REQUIRED_COLUMNS[0])?,
            title: position(REQUIRED_COLUMNS[1])?,
            description: position(REQUIRED_COLUMNS[2])?,
            vendor: position(REQUIRED_COLUMNS[3])?,
            product_type: position(REQUIRED_COLUMNS[4])?,
            tags: position(REQUIRED_COLUMNS[5])?,
            price: position(REQUIRED_COLUMNS[6])?,
        })
    }
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a catalog file from disk
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadedRows> {
        let file = File::open(path.as_ref())?;
        self.load_reader(file)
    }

    /// Load catalog rows from any reader
    ///
    /// Rows without a title, or whose description is empty once markup is
    /// stripped, are dropped. Unparseable prices become `None`.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadedRows> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut loaded = LoadedRows::default();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            loaded.stats.rows_read += 1;

            let Some(title) = field(&record, columns.title).filter(|t| !t.trim().is_empty())
            else {
                debug!("Dropping row {}: missing title", line + 1);
                loaded.stats.missing_title += 1;
                continue;
            };

            let description = field(&record, columns.description).unwrap_or_default();
            let cleaned_description = clean_html(description);
            if cleaned_description.is_empty() {
                debug!("Dropping row {} ({}): empty description", line + 1, title);
                loaded.stats.empty_description += 1;
                continue;
            }

            loaded.products.push(RawProduct {
                id: field(&record, columns.id).unwrap_or_default().trim().to_string(),
                title: title.to_string(),
                description: description.to_string(),
                cleaned_description,
                vendor: field(&record, columns.vendor)
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                product_type: field(&record, columns.product_type)
                    .map(|t| t.trim().to_lowercase())
                    .unwrap_or_default(),
                tags: parse_tags(field(&record, columns.tags)),
                price: parse_price(field(&record, columns.price)),
            });
        }

        loaded.stats.loaded = loaded.products.len();
        info!(
            "Loaded {} products ({} rows read, {} without title, {} without description)",
            loaded.stats.loaded,
            loaded.stats.rows_read,
            loaded.stats.missing_title,
            loaded.stats.empty_description
        );

        Ok(loaded)
    }
}

/// Non-empty cell at `index`, if the row has one
fn field(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index).filter(|value| !value.is_empty())
}

/// Split a comma-separated tag cell into lower-cased, trimmed tags
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|tags| {
        tags.split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Parse a price cell, returning `None` for anything that is not a valid amount
pub fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|price| price.is_finite() && *price >= 0.0)
}
