//! C4+C5: search and personalization service. Exposes keyword/semantic
//! search, click feedback, and the user interest store behind an axum
//! HTTP API.

use std::sync::Arc;

use newsline_common::{Config, HashingEmbedder};
use newsline_search::{build_router, AppState, UserProfileStore};
use newsline_searchengine::SearchEngineClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();
    newsline_search::metrics::install();

    let config = Config::from_env()?;
    config.log_summary();

    let search = SearchEngineClient::new(
        &config.typesense_host,
        config.typesense_port,
        &config.typesense_protocol,
        &config.typesense_api_key,
    )?;
    search.ensure_news_collection().await?;

    let users = UserProfileStore::connect(&config.user_profile_db_url).await?;
    users.migrate().await?;

    let state = AppState {
        search: Arc::new(search),
        users,
        config: config.clone(),
        embedder: Arc::new(HashingEmbedder),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.http_host, config.http_port);
    info!(%addr, "starting search server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
