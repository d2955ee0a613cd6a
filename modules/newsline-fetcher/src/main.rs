//! C1: rate-limited fetcher. Reads seed URLs, fetches each under a global
//! concurrency cap and a per-host minimum interval, and publishes the raw
//! HTML onto the raw-pages queue for the article store to consume.

mod error;
mod rate_limiter;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use futures::stream::{self, StreamExt};
use newsline_common::{host_of, now_iso, seeds, Config, RawPage};
use newsline_queue::RawPageQueue;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use error::FetchError;
use rate_limiter::HostRateLimiter;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const USER_AGENT: &str = "newsline-fetcher/0.1";

#[derive(Parser)]
#[command(name = "newsline-fetcher", about = "Fetch seed URLs and publish raw pages")]
struct Cli {
    /// Path to the seed YAML file.
    #[arg(long, default_value = "seeds.yml")]
    seeds: PathBuf,

    /// Fetch at most this many URLs, in seed order (0 = no limit).
    #[arg(long, default_value_t = 0)]
    max: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.log_summary();

    let seeds = seeds::load_seeds(&cli.seeds)?;
    let mut urls = seeds::flatten_urls(&seeds);
    if cli.max > 0 && urls.len() > cli.max {
        urls.truncate(cli.max);
    }
    info!(url_count = urls.len(), "loaded seed urls");

    let http = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let queue = Arc::new(RawPageQueue::connect(&config.rabbitmq_uri, &config.raw_pages_queue).await?);
    let rate_limiter = Arc::new(HostRateLimiter::new(config.fetch_interval));
    let semaphore = Arc::new(Semaphore::new(config.fetch_concurrency));

    let results: Vec<std::result::Result<(), FetchError>> = stream::iter(urls)
        .map(|url| {
            let http = http.clone();
            let queue = queue.clone();
            let rate_limiter = rate_limiter.clone();
            let semaphore = semaphore.clone();
            async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                fetch_and_publish(&http, &queue, &rate_limiter, &url).await
            }
        })
        .buffer_unordered(config.fetch_concurrency)
        .collect()
        .await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(attempted = results.len(), failed, "fetch run complete");
    Ok(())
}

/// Fetch one URL under the host's rate limit, retrying transport failures
/// with exponential backoff, then publish the page or drop it.
async fn fetch_and_publish(
    http: &reqwest::Client,
    queue: &RawPageQueue,
    rate_limiter: &HostRateLimiter,
    url: &str,
) -> std::result::Result<(), FetchError> {
    let host = host_of(url);
    rate_limiter.wait_turn(&host).await;

    let mut attempt = 0;
    loop {
        attempt += 1;
        match http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let status = resp.status();
                let html = resp.text().await.map_err(|e| FetchError::Http { url: url.to_string(), source: e })?;
                let page = RawPage { url: url.to_string(), html, fetched_time: now_iso() };
                queue.publish(&page).await?;
                info!(url, status = status.as_u16(), "fetched and published");
                return Ok(());
            }
            Ok(resp) => {
                warn!(url, status = resp.status().as_u16(), "non-success status, dropping");
                return Err(FetchError::Status { url: url.to_string(), status: resp.status().as_u16() });
            }
            Err(e) if attempt >= MAX_ATTEMPTS => {
                warn!(url, attempt, error = %e, "giving up after max attempts");
                return Err(FetchError::Http { url: url.to_string(), source: e });
            }
            Err(e) => {
                let delay = Duration::from_secs(2u64.pow(attempt));
                warn!(url, attempt, error = %e, delay_secs = delay.as_secs(), "transport error, retrying");
                tokio::time::sleep(delay).await;
            }
        }
    }
}
