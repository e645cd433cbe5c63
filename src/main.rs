use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cinematch_api::{
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::{
        corpus::{load_records_from_paths, load_snapshot, save_snapshot},
        PosterProvider, RecommendationIndex, TmdbPosterProvider,
    },
};
use tracing_subscriber::EnvFilter;

/// Loads the snapshot when one exists, otherwise builds from the raw tables
fn load_or_build_index(config: &Config) -> anyhow::Result<RecommendationIndex> {
    if let Some(path) = config.snapshot_path.as_deref() {
        if Path::new(path).exists() {
            return Ok(load_snapshot(path)?);
        }
    }

    tracing::info!(
        movies_csv = %config.movies_csv,
        credits_csv = %config.credits_csv,
        limit = config.corpus_limit,
        "Building recommendation index"
    );
    let records = load_records_from_paths(&config.movies_csv, &config.credits_csv, config.corpus_limit)?;
    let index = RecommendationIndex::build(&records, config.max_features)?;

    if let Some(path) = config.snapshot_path.as_deref() {
        save_snapshot(&index, path)?;
    }
    Ok(index)
}

fn create_cache(config: &Config) -> anyhow::Result<Option<(Cache, CacheWriterHandle)>> {
    match config.redis_url.as_deref() {
        Some(url) => {
            let client = create_redis_client(url)?;
            tracing::info!("Poster cache enabled");
            Ok(Some(Cache::new(client)))
        }
        None => {
            tracing::info!("REDIS_URL not set, poster cache disabled");
            Ok(None)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // CPU-bound; the server does not start until the index is complete
    let build_config = config.clone();
    let index = tokio::task::spawn_blocking(move || load_or_build_index(&build_config)).await??;

    let (cache, cache_handle) = match create_cache(&config)? {
        Some((cache, handle)) => (Some(cache), Some(handle)),
        None => (None, None),
    };
    let poster_provider: Arc<dyn PosterProvider> = Arc::new(TmdbPosterProvider::new(&config, cache)?);

    let state = Arc::new(AppState {
        index: Arc::new(index),
        poster_provider,
        poster_timeout: Duration::from_millis(config.poster_timeout_ms),
        default_top_n: config.default_top_n,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}
