//! C2: article store. Consumes raw pages off the queue, extracts
//! structured fields, and upserts the resulting article record.

use futures::StreamExt;
use newsline_common::Config;
use newsline_queue::{ack, decode_raw_page, drop_poison_message, RawPageQueue};
use newsline_store::{extract, ArticleStore};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = Config::from_env()?;
    config.log_summary();

    let store = ArticleStore::connect(&config.mongo_uri).await?;
    store.ensure_indexes().await?;

    let queue = RawPageQueue::connect(&config.rabbitmq_uri, &config.raw_pages_queue).await?;
    let mut consumer = queue.consume("newsline-store").await?;

    info!("waiting for raw pages");
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(d) => d,
            Err(e) => {
                error!(error = %e, "consumer error");
                continue;
            }
        };

        let page = match decode_raw_page(&delivery.data) {
            Ok(p) => p,
            Err(e) => {
                drop_poison_message(&delivery, &e.to_string()).await?;
                continue;
            }
        };

        let fields = extract::extract(&page.html, &page.url);
        let record = newsline_store::build_record(&page, &fields);

        match store.upsert(&record).await {
            Ok(()) => {
                ack(&delivery).await?;
                info!(canonical_url = %record.canonical_url, hash = %record.hash, "upserted article");
            }
            Err(e) => {
                warn!(canonical_url = %record.canonical_url, error = %e, "upsert failed, leaving unacked");
            }
        }
    }

    Ok(())
}
