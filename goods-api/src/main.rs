//! Product Search API Server
//!
//! HTTP API server answering natural-language product queries over a catalog file.

mod config;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use axum::{
    http::{header, Method},
    Router,
};
use goods_catalog::{Catalog, RuleBasedAnalyzer};
use goods_embedding::{
    Embedder, EmbeddingClient, EmbeddingIndex, LocalEmbedder, SqliteProductStore,
};
use goods_llm::{OpenAIClient, QueryInterpreter};
use goods_services::{load_into_store, SearchService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{AppConfig, EmbeddingProvider};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
}

fn openai_config(config: &AppConfig) -> OpenAIConfig {
    let mut openai = OpenAIConfig::new();
    if let Some(key) = &config.openai_api_key {
        openai = openai.with_api_key(key);
    }
    if let Some(base) = &config.openai_api_base {
        openai = openai.with_api_base(base);
    }
    openai
}

fn build_embedder(config: &AppConfig) -> anyhow::Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.embedding_provider {
        EmbeddingProvider::OpenAI => Arc::new(
            EmbeddingClient::with_config(openai_config(config))
                .with_model(&config.embedding_model, config.embedding_dimension),
        ),
        EmbeddingProvider::Local => Arc::new(
            LocalEmbedder::new(config.embedding_cache_dir.clone())
                .context("Failed to load local embedding model")?,
        ),
    };
    info!(
        "Using embedding model {} ({} dimensions)",
        embedder.model(),
        embedder.dimension()
    );
    Ok(embedder)
}

async fn build_search_service(config: &AppConfig) -> anyhow::Result<SearchService> {
    info!("Loading catalog from {}", config.catalog_path.display());
    let catalog = Catalog::load(&config.catalog_path, &RuleBasedAnalyzer::new())
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path.display()))?;
    info!("Catalog ready with {} products", catalog.len());
    let catalog = Arc::new(catalog);

    let embedder = build_embedder(config)?;
    let index = EmbeddingIndex::build(&catalog.normalized_descriptions(), embedder.as_ref())
        .await
        .context("Failed to embed catalog descriptions")?;
    let index = Arc::new(index);

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set - chat queries will not be understood");
    }
    let chat = OpenAIClient::with_config(openai_config(config)).with_model(&config.chat_model);
    let interpreter = QueryInterpreter::new(Arc::new(chat));

    let mut search = SearchService::new(catalog.clone(), interpreter, embedder, index.clone())
        .with_top_k(config.top_k);

    // Vector queries read from the store when one is configured
    if let Some(path) = &config.store_path {
        info!("Initializing product store at: {}", path.display());
        let store = SqliteProductStore::new(path)
            .with_context(|| format!("Failed to open product store {}", path.display()))?;
        let report = load_into_store(&catalog, &index, &store);
        if report.failed > 0 || report.skipped > 0 {
            warn!(
                "{} products could not be stored, {} skipped as duplicate ids",
                report.failed, report.skipped
            );
        }
        search = search.with_store(Arc::new(store));
    }

    Ok(search)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,goods_api=debug")),
        )
        .init();

    info!("Starting Product Search API");

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let search = build_search_service(&config).await?;

    let state = AppState {
        search: Arc::new(search),
    };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = Router::new()
        .merge(routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
