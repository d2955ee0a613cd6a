pub mod error;
pub mod extract;
pub mod mongo;

pub use error::{Result, StoreError};
pub use mongo::ArticleStore;

use newsline_common::{content_hash, host_of, now_iso, ArticleRecord, ExtractedFields, RawPage};

/// Build the article record to persist from a raw page and its extracted
/// fields (spec §4.2 step 2-4).
pub fn build_record(page: &RawPage, fields: &ExtractedFields) -> ArticleRecord {
    let hash = content_hash(&fields.body);
    let source = host_of(&fields.canonical_url);
    ArticleRecord {
        id: format!("{}:{}", fields.canonical_url, hash),
        url: page.url.clone(),
        canonical_url: fields.canonical_url.clone(),
        source,
        title: fields.title.clone(),
        body: fields.body.clone(),
        author: fields.author.clone(),
        tags: fields.tags.clone(),
        published_at: fields.published_at.clone(),
        fetched_at: page.fetched_time.clone(),
        hash,
        updated: now_iso(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_combines_canonical_url_and_hash() {
        let page = RawPage { url: "https://a.example/raw".into(), html: String::new(), fetched_time: now_iso() };
        let fields = ExtractedFields {
            canonical_url: "https://a.example/article".into(),
            title: "T".into(),
            body: "body text".into(),
            author: None,
            tags: vec![],
            published_at: None,
        };
        let record = build_record(&page, &fields);
        assert_eq!(record.source, "a.example");
        assert!(record.id.starts_with("https://a.example/article:"));
    }
}
