mod analysis;
mod cache;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod screening;
mod state;
mod template;
mod upload;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{CachedModel, InMemoryCache, NoCache, RedisCache, ResponseCache};
use crate::config::{CacheBackend, Config};
use crate::extraction::PdfTextExtractor;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast when GOOGLE_API_KEY is missing
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(
        config.google_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )
    .context("failed to build the Gemini HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let cache = build_cache(&config)?;
    let model = Arc::new(CachedModel::new(Arc::new(llm), cache));

    let state = AppState {
        config: config.clone(),
        model,
        extractor: Arc::new(PdfTextExtractor),
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

fn build_cache(config: &Config) -> Result<Arc<dyn ResponseCache>> {
    let cache: Arc<dyn ResponseCache> = match config.cache_backend {
        CacheBackend::Memory => {
            info!(
                "Reply cache: in-memory ({} entries max, ttl {}s)",
                config.cache_max_entries, config.cache_ttl_secs
            );
            Arc::new(InMemoryCache::new(
                config.cache_max_entries,
                Duration::from_secs(config.cache_ttl_secs),
            ))
        }
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .clone()
                .context("CACHE_BACKEND=redis needs REDIS_URL")?;
            let client = redis::Client::open(url)?;
            info!("Reply cache: redis (ttl {}s)", config.cache_ttl_secs);
            Arc::new(RedisCache::new(client, config.cache_ttl_secs))
        }
        CacheBackend::None => {
            info!("Reply cache disabled");
            Arc::new(NoCache)
        }
    };
    Ok(cache)
}
