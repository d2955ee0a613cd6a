use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Embedding dimensionality produced by the (externally owned) sentence
/// embedding model. See spec §1: `embed(text) -> float[D]`, `D=384`.
pub const EMBEDDING_DIM: usize = 384;

/// The queue payload produced by the fetcher (C1) and consumed by the
/// article store (C2). Immutable once published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    pub url: String,
    pub html: String,
    pub fetched_time: String,
}

/// Fields the (externally owned) HTML extractor produces from a raw page.
/// Treated as the output of a pure function `extract(raw_html, url)`.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub canonical_url: String,
    pub title: String,
    pub body: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<String>,
}

/// A persisted article as stored in the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: String,
    pub url: String,
    pub canonical_url: String,
    pub source: String,
    pub title: String,
    pub body: String,
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_at: Option<String>,
    pub fetched_at: String,
    pub hash: String,
    pub updated: String,
}

/// The document mirrored into the search engine's `news` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: String,
    pub title: String,
    pub body: String,
    pub source: String,
    pub tags: Vec<String>,
    pub published_at: i64,
    pub vec: Vec<f32>,
}

/// Per-user running-mean interest vector, maintained by click feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInterest {
    pub user_id: String,
    pub interest: Vec<f32>,
    pub cnt: i64,
    pub updated_at: DateTime<Utc>,
}

/// MD5 of the extracted body's UTF-8 bytes, hex-encoded. This is the
/// dedup/version axis named in spec §3: identity key is
/// `(canonical_url, hash)`.
pub fn content_hash(body: &str) -> String {
    format!("{:x}", md5::compute(body.as_bytes()))
}

/// host(url) — the `source` field is derived from the canonical URL's host.
pub fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// ISO-8601 UTC timestamp stamped with a trailing `Z`, per spec's
/// "fetched_time (ISO-8601 UTC, Zulu-suffixed)" convention.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opt(chrono::SecondsFormat::Secs, true)
}

/// Normalize an arbitrary timestamp string to ISO-8601 UTC with a
/// trailing `Z`. Returns `None` on unparseable input — callers leave the
/// field null rather than guessing (spec §4.2 step 2).
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).to_rfc3339_opt(chrono::SecondsFormat::Secs, true));
    }
    // Accept a bare date, e.g. "2024-01-02"
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let dt = date.and_hms_opt(0, 0, 0)?.and_utc();
        return Some(dt.to_rfc3339_opt(chrono::SecondsFormat::Secs, true));
    }
    None
}

/// ISO-8601 timestamp -> epoch seconds, per spec §4.3. Null/unparseable
/// becomes `0`.
pub fn iso_to_epoch(ts: Option<&str>) -> i64 {
    match ts {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp())
            .unwrap_or(0),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_deterministic_md5() {
        let h1 = content_hash("hello world");
        let h2 = content_hash("hello world");
        assert_eq!(h1, h2);
        // md5("hello world") is a well-known vector.
        assert_eq!(h1, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn content_hash_differs_for_different_bodies() {
        assert_ne!(content_hash("a"), content_hash("b"));
    }

    #[test]
    fn host_of_extracts_host() {
        assert_eq!(host_of("https://a.example/x?y=1"), "a.example");
    }

    #[test]
    fn iso_to_epoch_null_is_zero() {
        assert_eq!(iso_to_epoch(None), 0);
    }

    #[test]
    fn iso_to_epoch_roundtrips() {
        let e = iso_to_epoch(Some("2024-01-01T00:00:00Z"));
        assert_eq!(e, 1704067200);
    }

    #[test]
    fn normalize_timestamp_rejects_garbage() {
        assert_eq!(normalize_timestamp("not-a-date"), None);
    }
}
