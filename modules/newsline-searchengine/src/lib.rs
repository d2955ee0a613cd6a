//! Thin `reqwest`-based client for the search engine (Typesense) collection
//! described in spec §4.3 / §6. Mirrors the teacher's pattern of a
//! dedicated, single-purpose external-service wrapper crate
//! (`ai-client`, `apify-client`, `browserless-client`).

pub mod error;
pub mod types;

use std::time::Duration;

pub use error::{Result, SearchEngineError};
use newsline_common::SearchDocument;
pub use types::{news_schema, CollectionSchema, SearchHit, SearchResponse};

pub struct SearchEngineClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Search engine connect timeout, per spec §5.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

impl SearchEngineClient {
    pub fn new(host: &str, port: u16, protocol: &str, api_key: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: format!("{protocol}://{host}:{port}"),
            api_key: api_key.to_string(),
        })
    }

    fn req(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-TYPESENSE-API-KEY", &self.api_key)
    }

    /// `GET /health` (spec §4.4).
    pub async fn health(&self) -> Result<serde_json::Value> {
        let resp = self.req(reqwest::Method::GET, "/health").send().await?;
        let status = resp.status();
        let body: serde_json::Value = resp.json().await.unwrap_or(serde_json::Value::Null);
        if !status.is_success() {
            return Err(SearchEngineError::Api { status: status.as_u16(), message: body.to_string() });
        }
        Ok(body)
    }

    /// Idempotent schema bootstrap for the `news` collection (spec §4.3).
    /// Creates the collection if absent; leaves it untouched otherwise.
    pub async fn ensure_news_collection(&self) -> Result<()> {
        let resp = self.req(reqwest::Method::GET, "/collections/news").send().await?;
        if resp.status().is_success() {
            tracing::debug!("news collection already exists");
            return Ok(());
        }
        if resp.status() != reqwest::StatusCode::NOT_FOUND {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchEngineError::Api { status: status.as_u16(), message: body });
        }

        let schema = news_schema();
        let resp = self
            .req(reqwest::Method::POST, "/collections")
            .json(&schema)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchEngineError::Api { status: status.as_u16(), message: body });
        }
        tracing::info!("created news collection");
        Ok(())
    }

    /// Bulk-upsert a batch of documents via newline-delimited JSON import
    /// (spec §4.3, §6). Any per-document failure fails the whole batch —
    /// the indexer treats partial batch failure as full tick failure.
    pub async fn import_upsert(&self, docs: &[SearchDocument]) -> Result<()> {
        if docs.is_empty() {
            return Ok(());
        }
        let body = docs
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .join("\n");

        let resp = self
            .req(reqwest::Method::POST, "/collections/news/documents/import?action=upsert")
            .header("Content-Type", "text/plain")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SearchEngineError::Api { status: status.as_u16(), message: text });
        }

        for (i, line) in text.lines().enumerate() {
            let result: types::ImportResult = serde_json::from_str(line)?;
            if !result.success {
                return Err(SearchEngineError::ImportFailed(format!(
                    "document {i}: {}",
                    result.error.unwrap_or_default()
                )));
            }
        }
        Ok(())
    }

    /// Keyword search over `title,body`, sorted by `published_at desc`
    /// (spec §4.4 keyword mode).
    pub async fn search_keyword(&self, q: &str, limit: u32, cursor: Option<&str>) -> Result<SearchResponse> {
        let mut req = self
            .req(reqwest::Method::GET, "/collections/news/documents/search")
            .query(&[
                ("q", q),
                ("query_by", "title,body"),
                ("sort_by", "published_at:desc"),
            ])
            .query(&[("per_page", limit)]);
        if let Some(c) = cursor {
            req = req.query(&[("cursor", c)]);
        }
        self.run_search(req).await
    }

    /// Articles filtered by tag, sorted by `published_at desc` (spec §11,
    /// supplemented `/by-tag`).
    pub async fn search_by_tag(&self, tag: &str, limit: u32, cursor: Option<&str>) -> Result<SearchResponse> {
        let filter = format!("tags:=[{tag}]");
        let mut req = self
            .req(reqwest::Method::GET, "/collections/news/documents/search")
            .query(&[
                ("q", "*"),
                ("query_by", "title"),
                ("filter_by", filter.as_str()),
                ("sort_by", "published_at:desc"),
            ])
            .query(&[("per_page", limit)]);
        if let Some(c) = cursor {
            req = req.query(&[("cursor", c)]);
        }
        self.run_search(req).await
    }

    /// Most recent articles, no query term (spec §11, supplemented `/latest`).
    pub async fn latest(&self, limit: u32) -> Result<SearchResponse> {
        let req = self
            .req(reqwest::Method::GET, "/collections/news/documents/search")
            .query(&[("q", "*"), ("query_by", "title"), ("sort_by", "published_at:desc")])
            .query(&[("per_page", limit)]);
        self.run_search(req).await
    }

    /// Vector (semantic) query against a given embedding, `k=limit`
    /// (spec §4.4 semantic mode, and the user-vector query for blending).
    pub async fn search_vector(&self, vec: &[f32], k: u32) -> Result<SearchResponse> {
        let vec_str = vec.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        let vector_query = format!("vec:([{vec_str}], k:{k})");
        let req = self
            .req(reqwest::Method::GET, "/collections/news/documents/search")
            .query(&[("q", "*"), ("query_by", "title"), ("vector_query", vector_query.as_str())])
            .query(&[("per_page", k)]);
        self.run_search(req).await
    }

    /// Fetch a single document by id, used by the click handler (spec §4.4).
    pub async fn get_document(&self, id: &str) -> Result<SearchDocument> {
        let resp = self
            .req(reqwest::Method::GET, &format!("/collections/news/documents/{id}"))
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SearchEngineError::NotFound);
        }
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchEngineError::Api { status: status.as_u16(), message: body });
        }
        Ok(resp.json().await?)
    }

    async fn run_search(&self, req: reqwest::RequestBuilder) -> Result<SearchResponse> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchEngineError::Api { status: status.as_u16(), message: body });
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_expected_dim() {
        let schema = news_schema();
        let vec_field = schema.fields.iter().find(|f| f.name == "vec").unwrap();
        assert_eq!(vec_field.num_dim, Some(384));
    }
}
