//! Server configuration from environment variables

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use goods_embedding::{LOCAL_DIMENSION, LOCAL_MODEL};
use goods_llm::DEFAULT_CHAT_MODEL;

const DEFAULT_CATALOG_PATH: &str = "products.csv";
const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_OPENAI_DIMENSION: usize = 1536;
const DEFAULT_TOP_K: usize = 5;
const DEFAULT_PORT: u16 = 8000;

/// Which model turns descriptions into vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    OpenAI,
    /// all-MiniLM-L6-v2 run in-process through fastembed
    Local,
}

impl FromStr for EmbeddingProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "local" | "fastembed" => Ok(Self::Local),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    pub chat_model: String,
    pub embedding_provider: EmbeddingProvider,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    /// Where the local model files are cached
    pub embedding_cache_dir: Option<PathBuf>,
    /// SQLite file for the product store; vector queries use it when set
    pub store_path: Option<PathBuf>,
    pub top_k: usize,
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// Reads CATALOG_PATH, OPENAI_API_KEY, OPENAI_API_BASE, CHAT_MODEL,
    /// EMBEDDING_PROVIDER, EMBEDDING_MODEL, EMBEDDING_DIMENSION,
    /// EMBEDDING_CACHE_DIR, STORE_PATH, TOP_K and SERVER_PORT.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY");

        let embedding_provider = match var("EMBEDDING_PROVIDER") {
            Some(value) => value.parse()?,
            None if openai_api_key.is_some() => EmbeddingProvider::OpenAI,
            None => EmbeddingProvider::Local,
        };

        // The local model has a fixed name and size
        let (embedding_model, embedding_dimension) = match embedding_provider {
            EmbeddingProvider::OpenAI => {
                if openai_api_key.is_none() {
                    return Err(ConfigError::MissingApiKey);
                }
                (
                    var("EMBEDDING_MODEL")
                        .unwrap_or_else(|| DEFAULT_OPENAI_EMBEDDING_MODEL.to_string()),
                    parse_number(&var, "EMBEDDING_DIMENSION", DEFAULT_OPENAI_DIMENSION)?,
                )
            }
            EmbeddingProvider::Local => (LOCAL_MODEL.to_string(), LOCAL_DIMENSION),
        };

        let top_k = parse_number(&var, "TOP_K", DEFAULT_TOP_K)?;
        if top_k == 0 {
            return Err(ConfigError::InvalidNumber {
                field: "TOP_K".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            catalog_path: var("CATALOG_PATH")
                .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
                .into(),
            openai_api_key,
            openai_api_base: var("OPENAI_API_BASE"),
            chat_model: var("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embedding_provider,
            embedding_model,
            embedding_dimension,
            embedding_cache_dir: var("EMBEDDING_CACHE_DIR").map(PathBuf::from),
            store_path: var("STORE_PATH").map(PathBuf::from),
            top_k,
            server_port: parse_number(&var, "SERVER_PORT", DEFAULT_PORT)?,
        })
    }
}

fn parse_number<T, F>(var: &F, field: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(field) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                field: field.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid number in {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Unknown EMBEDDING_PROVIDER {0:?} (expected openai or local)")]
    UnknownProvider(String),

    #[error("EMBEDDING_PROVIDER=openai requires OPENAI_API_KEY")]
    MissingApiKey,
}
