//! C3: incremental indexer. On an interval, pulls articles updated since
//! the last watermark, embeds them, and upserts them into the search
//! engine's `news` collection.

use std::path::PathBuf;
use std::time::Duration;

use mongodb::Client;
use newsline_common::Config;
use newsline_indexer::{articles_collection, run_tick, watermark, HashingEmbedder};
use newsline_searchengine::SearchEngineClient;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = Config::from_env()?;
    config.log_summary();

    let mongo = Client::with_uri_str(&config.mongo_uri).await?;
    let articles = articles_collection(&mongo);

    let search = SearchEngineClient::new(
        &config.typesense_host,
        config.typesense_port,
        &config.typesense_protocol,
        &config.typesense_api_key,
    )?;
    search.ensure_news_collection().await?;

    let embedder = HashingEmbedder;
    let watermark_path = PathBuf::from(&config.watermark_file);
    let interval = Duration::from_secs(config.indexer_interval_secs);

    info!(interval_secs = config.indexer_interval_secs, "starting indexer interval loop");
    loop {
        let current = watermark::load(&watermark_path)?;
        match run_tick(&articles, &search, &embedder, &current).await {
            Ok(Some(new_watermark)) => {
                watermark::save(&watermark_path, &new_watermark)?;
                info!(watermark = %new_watermark, "indexer tick complete, watermark advanced");
            }
            Ok(None) => {
                info!("indexer tick complete, nothing new");
            }
            Err(e) => {
                error!(error = %e, "indexer tick failed, watermark left unchanged");
            }
        }
        tokio::time::sleep(interval).await;
    }
}
