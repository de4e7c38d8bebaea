//! SQLite product store using rusqlite

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{EmbeddingError, Result},
    similarity::cosine_similarity,
    types::{StoredMatch, StoredProduct},
};

/// Persistent product storage with nearest-neighbor lookup
pub trait ProductStore: Send + Sync {
    /// Insert a product, replacing any existing row with the same id
    fn upsert_record(&self, product: &StoredProduct) -> Result<()>;

    /// Up to `k` stored products closest to `query`, best first
    fn nearest_k(&self, query: &[f32], k: usize) -> Result<Vec<StoredMatch>>;
}

/// SQLite store for products and their embeddings
#[derive(Clone)]
pub struct SqliteProductStore {
    conn: Arc<Mutex<Connection>>,
}

/// Raw column values before decoding
struct ProductRow {
    id: String,
    title: String,
    description: String,
    vendor: String,
    product_type: String,
    tags: String,
    price: Option<f64>,
    normalized_description: String,
    entities: String,
    embedding: Vec<u8>,
}

const SELECT_COLUMNS: &str = "SELECT id, title, description, vendor, product_type, tags, price,
        normalized_description, entities, embedding
     FROM products";

impl ProductRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            vendor: row.get(3)?,
            product_type: row.get(4)?,
            tags: row.get(5)?,
            price: row.get(6)?,
            normalized_description: row.get(7)?,
            entities: row.get(8)?,
            embedding: row.get(9)?,
        })
    }

    fn decode(self) -> Result<StoredProduct> {
        Ok(StoredProduct {
            id: self.id,
            title: self.title,
            description: self.description,
            vendor: self.vendor,
            product_type: self.product_type,
            tags: serde_json::from_str(&self.tags)?,
            price: self.price,
            normalized_description: self.normalized_description,
            entities: serde_json::from_str(&self.entities)?,
            embedding: bincode::deserialize(&self.embedding)?,
        })
    }
}

impl SqliteProductStore {
    /// Open (or create) a store at `database_path`
    #[instrument(skip(database_path))]
    pub fn new<P: AsRef<Path> + std::fmt::Debug>(database_path: P) -> Result<Self> {
        info!("Opening product database: {:?}", database_path.as_ref());
        let conn = Connection::open(database_path.as_ref())
            .map_err(|e| EmbeddingError::Database(format!("Failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            EmbeddingError::Database(format!("Failed to create in-memory DB: {}", e))
        })?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables
    fn init_tables(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                vendor TEXT NOT NULL,
                product_type TEXT NOT NULL,
                tags TEXT NOT NULL,
                price REAL,
                normalized_description TEXT NOT NULL,
                entities TEXT NOT NULL,
                embedding BLOB NOT NULL,
                dimension INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| EmbeddingError::Database(e.to_string()))?;

        debug!("Product table initialized");
        Ok(())
    }

    /// Fetch one product by id
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<StoredProduct> {
        let conn = self.conn.lock();

        let row = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                params![id],
                ProductRow::from_row,
            )
            .optional()
            .map_err(|e| EmbeddingError::Database(e.to_string()))?;

        match row {
            Some(row) => row.decode(),
            None => Err(EmbeddingError::NotFound(id.to_string())),
        }
    }

    /// Every stored product, in insertion order
    pub fn load_all(&self) -> Result<Vec<StoredProduct>> {
        let conn = self.conn.lock();

        let mut stmt = conn
            .prepare(&format!("{} ORDER BY rowid", SELECT_COLUMNS))
            .map_err(|e| EmbeddingError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], ProductRow::from_row)
            .map_err(|e| EmbeddingError::Database(e.to_string()))?;

        let mut products = Vec::new();
        for row in rows {
            let row = row.map_err(|e| EmbeddingError::Database(e.to_string()))?;
            products.push(row.decode()?);
        }

        Ok(products)
    }

    /// Number of stored products
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .map_err(|e| EmbeddingError::Database(e.to_string()))?;
        Ok(count as usize)
    }
}

impl ProductStore for SqliteProductStore {
    #[instrument(skip(self, product), fields(id = %product.id))]
    fn upsert_record(&self, product: &StoredProduct) -> Result<()> {
        if product.id.trim().is_empty() {
            return Err(EmbeddingError::MissingId(product.title.clone()));
        }

        let tags = serde_json::to_string(&product.tags)?;
        let entities = serde_json::to_string(&product.entities)?;
        let embedding_bytes = bincode::serialize(&product.embedding)?;

        let mut conn = self.conn.lock();
        // Dropping an uncommitted transaction rolls it back
        let tx = conn
            .transaction()
            .map_err(|e| EmbeddingError::Database(e.to_string()))?;

        tx.execute(
            "INSERT INTO products
             (id, title, description, vendor, product_type, tags, price,
              normalized_description, entities, embedding, dimension, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                vendor = excluded.vendor,
                product_type = excluded.product_type,
                tags = excluded.tags,
                price = excluded.price,
                normalized_description = excluded.normalized_description,
                entities = excluded.entities,
                embedding = excluded.embedding,
                dimension = excluded.dimension,
                updated_at = excluded.updated_at",
            params![
                &product.id,
                &product.title,
                &product.description,
                &product.vendor,
                &product.product_type,
                &tags,
                product.price,
                &product.normalized_description,
                &entities,
                &embedding_bytes,
                product.dimension() as i64,
                Utc::now().timestamp(),
            ],
        )
        .map_err(|e| EmbeddingError::Database(e.to_string()))?;

        tx.commit()
            .map_err(|e| EmbeddingError::Database(e.to_string()))?;

        debug!("Saved product: {}", product.id);
        Ok(())
    }

    #[instrument(skip(self, query), fields(dimension = query.len()))]
    fn nearest_k(&self, query: &[f32], k: usize) -> Result<Vec<StoredMatch>> {
        let mut matches: Vec<StoredMatch> = Vec::new();

        for product in self.load_all()? {
            if product.dimension() != query.len() {
                warn!(
                    "Skipping product {}: embedding dimension {} does not match query {}",
                    product.id,
                    product.dimension(),
                    query.len()
                );
                continue;
            }
            let score = cosine_similarity(query, &product.embedding);
            matches.push(StoredMatch { product, score });
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(k);

        debug!("Found {} nearest products", matches.len());
        Ok(matches)
    }
}
