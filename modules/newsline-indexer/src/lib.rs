pub mod error;
pub mod watermark;

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use newsline_common::{iso_to_epoch, SearchDocument};
use newsline_searchengine::SearchEngineClient;

pub use error::{IndexError, Result};
pub use newsline_common::{Embedder, HashingEmbedder};

/// Mongo-document batches are flushed to the search engine at this size,
/// matching `original_source/crawler/indexer.py`'s `if len(docs_to_index) >= 500`.
pub const BATCH_SIZE: usize = 500;

/// One incremental-indexer tick (spec §4.3): find articles updated after
/// the watermark, embed and upsert them in batches, and advance the
/// watermark only once every batch in the tick has succeeded.
pub async fn run_tick(
    articles: &Collection<Document>,
    search: &SearchEngineClient,
    embedder: &dyn Embedder,
    watermark: &str,
) -> Result<Option<String>> {
    let filter = if watermark.is_empty() {
        doc! {}
    } else {
        doc! { "updated": { "$gt": watermark } }
    };

    let mut cursor = articles
        .find(filter)
        .sort(doc! { "updated": 1 })
        .await?;

    let mut batch: Vec<SearchDocument> = Vec::with_capacity(BATCH_SIZE);
    let mut new_watermark = watermark.to_string();

    while let Some(article) = cursor.try_next().await? {
        let search_doc = to_search_document(&article, embedder).await?;
        if let Some(updated) = article.get_str("updated").ok() {
            new_watermark = updated.to_string();
        }
        batch.push(search_doc);

        if batch.len() >= BATCH_SIZE {
            search.import_upsert(&batch).await?;
            tracing::info!(count = batch.len(), "indexed batch");
            batch.clear();
        }
    }

    if !batch.is_empty() {
        let count = batch.len();
        search.import_upsert(&batch).await?;
        tracing::info!(count, "indexed final batch");
    }

    if new_watermark != watermark {
        Ok(Some(new_watermark))
    } else {
        Ok(None)
    }
}

async fn to_search_document(article: &Document, embedder: &dyn Embedder) -> Result<SearchDocument> {
    let id = article
        .get_object_id("_id")
        .map(|oid| oid.to_hex())
        .or_else(|_| article.get_str("_id").map(str::to_string))
        .unwrap_or_default();
    let title = article.get_str("title").unwrap_or_default().to_string();
    let body = article.get_str("body").unwrap_or_default().to_string();
    let source = article.get_str("source").unwrap_or_default().to_string();
    let tags = article
        .get_array("tags")
        .map(|a| a.iter().filter_map(|v| v.as_str()).map(str::to_string).collect())
        .unwrap_or_default();
    let published_at = article.get_str("published_at").ok();
    let published_at_epoch = iso_to_epoch(published_at);

    let text = format!("{title}\n{body}");
    let vec = embedder.embed(&text).await?;

    Ok(SearchDocument { id, title, body, source, tags, published_at: published_at_epoch, vec })
}

pub fn articles_collection(client: &Client) -> Collection<Document> {
    let db = client.default_database().unwrap_or_else(|| client.database("news"));
    db.collection::<Document>("articles")
}
