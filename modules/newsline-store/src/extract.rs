//! HTML -> structured fields extraction (spec §4.2 step 2). A pure
//! function boundary: `extract(raw_html, url) -> ExtractedFields`.
//!
//! The main content heuristic prefers an `<article>` element, falling
//! back to `<body>`. Canonical URL, author and publish-time fallbacks
//! mirror the meta-tag precedence used upstream of this pipeline.

use newsline_common::{normalize_timestamp, ExtractedFields};
use scraper::{Html, Selector};

fn meta_content(doc: &Html, attr: &str, value: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[{attr}=\"{value}\"]")).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn extract(raw_html: &str, url: &str) -> ExtractedFields {
    let doc = Html::parse_document(raw_html);

    let title_sel = Selector::parse("title").unwrap();
    let title = doc
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let canonical_sel = Selector::parse("link[rel=\"canonical\"]").unwrap();
    let canonical_url = doc
        .select(&canonical_sel)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    let author = meta_content(&doc, "name", "author")
        .or_else(|| meta_content(&doc, "property", "article:author"))
        .or_else(|| meta_content(&doc, "name", "byl"));

    let published_raw = meta_content(&doc, "property", "article:published_time")
        .or_else(|| meta_content(&doc, "name", "pubdate"))
        .or_else(|| meta_content(&doc, "name", "publication_date"))
        .or_else(|| meta_content(&doc, "itemprop", "datePublished"));
    let published_at = published_raw.as_deref().and_then(normalize_timestamp);

    let body = extract_body(&doc);

    ExtractedFields {
        canonical_url,
        title,
        body,
        author,
        tags: Vec::new(),
        published_at,
    }
}

/// Prefer the `<article>` element's text, falling back to the full
/// `<body>` when no article element is present.
fn extract_body(doc: &Html) -> String {
    let article_sel = Selector::parse("article").unwrap();
    if let Some(el) = doc.select(&article_sel).next() {
        let text = el.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            return text;
        }
    }
    let body_sel = Selector::parse("body").unwrap();
    doc.select(&body_sel)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_canonical_title_and_article_body() {
        let html = r#"
            <html><head>
                <title>Headline</title>
                <link rel="canonical" href="https://a.example/article">
                <meta name="author" content="Jane Doe">
                <meta property="article:published_time" content="2024-01-02T10:00:00Z">
            </head><body>
                <nav>skip me</nav>
                <article><p>The full story goes here.</p></article>
            </body></html>
        "#;
        let fields = extract(html, "https://a.example/raw");
        assert_eq!(fields.canonical_url, "https://a.example/article");
        assert_eq!(fields.title, "Headline");
        assert_eq!(fields.author.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.published_at.as_deref(), Some("2024-01-02T10:00:00Z"));
        assert!(fields.body.contains("full story"));
        assert!(!fields.body.contains("skip me"));
    }

    #[test]
    fn missing_canonical_falls_back_to_request_url() {
        let fields = extract("<html><body></body></html>", "https://a.example/x");
        assert_eq!(fields.canonical_url, "https://a.example/x");
    }
}
