//! Search service answering chat queries over the catalog

use std::sync::Arc;

use goods_catalog::{match_products, Catalog};
use goods_core::{GoodsError, GoodsResult, ProductRecord};
use goods_embedding::{Embedder, EmbeddingIndex, ProductStore, DEFAULT_TOP_K};
use goods_llm::{Interpretation, QueryInterpreter};
use tracing::{debug, info, instrument, warn};

use crate::response::{format_products, NOT_UNDERSTOOD_MESSAGE};

/// Orchestrates interpretation, matching and vector lookup
#[derive(Clone)]
pub struct SearchService {
    catalog: Arc<Catalog>,
    interpreter: QueryInterpreter,
    embedder: Arc<dyn Embedder>,
    index: Arc<EmbeddingIndex>,
    store: Option<Arc<dyn ProductStore>>,
    top_k: usize,
}

impl SearchService {
    pub fn new(
        catalog: Arc<Catalog>,
        interpreter: QueryInterpreter,
        embedder: Arc<dyn Embedder>,
        index: Arc<EmbeddingIndex>,
    ) -> Self {
        Self {
            catalog,
            interpreter,
            embedder,
            index,
            store: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Answer vector queries from a persistent store instead of the in-memory index
    pub fn with_store(mut self, store: Arc<dyn ProductStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Attribute path: interpret, filter, sort by price
    #[instrument(skip(self))]
    pub async fn respond(&self, query: &str) -> String {
        match self.interpreter.interpret(query).await {
            Interpretation::Understood(constraints) => {
                let products = match_products(&self.catalog, &constraints);
                info!("Matched {} products", products.len());
                format_products(
                    products
                        .into_iter()
                        .map(|p| (p.title.as_str(), p.display_price())),
                )
            }
            Interpretation::NotUnderstood { reply } => {
                debug!("Query not understood, reply was: {}", reply);
                NOT_UNDERSTOOD_MESSAGE.to_string()
            }
            Interpretation::ServiceFailed { reason } => {
                warn!("Language model unavailable: {}", reason);
                NOT_UNDERSTOOD_MESSAGE.to_string()
            }
        }
    }

    /// Vector path: embed the extracted attributes and return the nearest products
    ///
    /// The price threshold is not applied on this path.
    #[instrument(skip(self))]
    pub async fn respond_vector(&self, query: &str) -> GoodsResult<String> {
        let attributes = match self.interpreter.interpret(query).await {
            Interpretation::Understood(constraints) if !constraints.attributes.is_empty() => {
                constraints.attributes
            }
            _ => return Ok(NOT_UNDERSTOOD_MESSAGE.to_string()),
        };

        let query_text = attributes.join(" ");
        let query_vector = self.embedder.embed(&query_text).await?;

        if let Some(store) = &self.store {
            let store = Arc::clone(store);
            let top_k = self.top_k;
            // Store scans decode every row
            let matches = tokio::task::spawn_blocking(move || store.nearest_k(&query_vector, top_k))
                .await
                .map_err(|e| GoodsError::internal(format!("Store lookup task failed: {}", e)))??;
            debug!("Store returned {} matches", matches.len());
            return Ok(format_products(
                matches
                    .iter()
                    .map(|m| (m.product.title.as_str(), m.product.display_price())),
            ));
        }

        let hits = self.index.nearest(&query_vector, self.top_k)?;
        debug!("Index returned {} hits", hits.len());
        let products = hits
            .iter()
            .map(|hit| self.record_at(hit.position))
            .collect::<GoodsResult<Vec<_>>>()?;

        Ok(format_products(
            products
                .into_iter()
                .map(|p| (p.title.as_str(), p.display_price())),
        ))
    }

    /// Nearest catalog records to arbitrary text, with their scores
    #[instrument(skip(self))]
    pub async fn semantic_search(
        &self,
        text: &str,
        k: usize,
    ) -> GoodsResult<Vec<(&ProductRecord, f32)>> {
        let query_vector = self.embedder.embed(text).await?;
        let hits = self.index.nearest(&query_vector, k)?;

        hits.iter()
            .map(|hit| Ok((self.record_at(hit.position)?, hit.score)))
            .collect()
    }

    fn record_at(&self, position: usize) -> GoodsResult<&ProductRecord> {
        self.catalog.get(position).ok_or_else(|| {
            GoodsError::internal(format!("Index position {} outside catalog", position))
        })
    }
}
