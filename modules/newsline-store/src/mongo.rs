//! MongoDB-backed article store (spec §3, §4.2). Articles are upserted
//! keyed by `(canonical_url, hash)` so a re-fetch of unchanged content is a
//! no-op write, matching `original_source/crawler/store.py`.

use mongodb::bson::{doc, to_bson};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use newsline_common::ArticleRecord;

use crate::error::Result;

pub struct ArticleStore {
    articles: Collection<ArticleRecord>,
}

impl ArticleStore {
    pub async fn connect(mongo_uri: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongo_uri).await?;
        let db = client.default_database().unwrap_or_else(|| client.database("news"));
        let articles = db.collection::<ArticleRecord>("articles");
        Ok(Self { articles })
    }

    /// Create the dedup and query-pattern indexes (spec §4.2):
    /// `canonical_url`, `hash`, and a compound `(source asc, published_at desc)`.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let canonical = IndexModel::builder().keys(doc! { "canonical_url": 1 }).build();
        let hash = IndexModel::builder().keys(doc! { "hash": 1 }).build();
        let source_published = IndexModel::builder()
            .keys(doc! { "source": 1, "published_at": -1 })
            .options(IndexOptions::builder().build())
            .build();
        self.articles
            .create_indexes(vec![canonical, hash, source_published])
            .await?;
        Ok(())
    }

    /// Upsert on `(canonical_url, hash)`: identical content for the same
    /// canonical URL is a no-op re-write, a changed hash creates a new
    /// version of the record (spec §3's identity key).
    pub async fn upsert(&self, record: &ArticleRecord) -> Result<()> {
        let filter = doc! {
            "canonical_url": &record.canonical_url,
            "hash": &record.hash,
        };
        let update = doc! { "$set": to_bson(record)? };
        self.articles
            .update_one(filter, update)
            .upsert(true)
            .await?;
        Ok(())
    }
}
