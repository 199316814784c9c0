mod applications;
mod catalog;
mod comparison;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod preferences;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::advice::LlmAdvisor;
use crate::catalog::cache::{CatalogCache, MemoryCatalogCache, RedisCatalogCache};
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting loan-compare API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Catalog cache: Redis when configured, process memory otherwise
    let catalog_cache: Arc<dyn CatalogCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Catalog cache: Redis (ttl {:?})", config.catalog_cache_ttl);
            Arc::new(RedisCatalogCache::new(client, config.catalog_cache_ttl))
        }
        None => {
            info!(
                "Catalog cache: in-process (ttl {:?}, capacity {})",
                config.catalog_cache_ttl, config.catalog_cache_capacity
            );
            Arc::new(MemoryCatalogCache::new(
                config.catalog_cache_ttl,
                config.catalog_cache_capacity,
            ))
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        db,
        advisor: Arc::new(LlmAdvisor::new(llm.clone())),
        llm,
        catalog_cache,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
