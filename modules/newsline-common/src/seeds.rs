use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NewslineError, Result};

/// A single named seed source (spec §3 "Seed Entry"). Unique by name;
/// carries zero or more of an RSS feed URL, a sitemap URL, and a set of
/// section URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,
}

/// The full seed mapping, read from a YAML file (`seeds.yml` by default).
/// Read-only to the pipeline; externally managed by the out-of-scope seed
/// CLI (spec §1, §6).
pub type Seeds = BTreeMap<String, SeedEntry>;

/// Load the seed mapping from `path`. A missing file is treated as "no
/// seeds defined" rather than an error, matching
/// `original_source/crawler/seed.py::load_seeds`.
pub fn load_seeds(path: &Path) -> Result<Seeds> {
    if !path.exists() {
        return Ok(Seeds::new());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| NewslineError::Config(format!("reading {}: {e}", path.display())))?;
    if text.trim().is_empty() {
        return Ok(Seeds::new());
    }
    serde_yaml::from_str(&text)
        .map_err(|e| NewslineError::Config(format!("parsing {}: {e}", path.display())))
}

/// Flatten every seed entry's rss/sitemap/section URLs into one ordered
/// sequence. Per spec §4.1 and the resolved Open Question in §12, RSS and
/// sitemap URLs are fetched directly, not expanded into per-article URLs.
pub fn flatten_urls(seeds: &Seeds) -> Vec<String> {
    let mut urls = Vec::new();
    for entry in seeds.values() {
        if let Some(rss) = &entry.rss {
            urls.push(rss.clone());
        }
        if let Some(sitemap) = &entry.sitemap {
            urls.push(sitemap.clone());
        }
        urls.extend(entry.sections.iter().cloned());
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_empty() {
        let seeds = load_seeds(Path::new("/nonexistent/seeds.yml")).unwrap();
        assert!(seeds.is_empty());
    }

    #[test]
    fn flatten_preserves_order_rss_sitemap_sections() {
        let mut seeds = Seeds::new();
        seeds.insert(
            "example".to_string(),
            SeedEntry {
                rss: Some("https://a.example/rss".to_string()),
                sitemap: Some("https://a.example/sitemap.xml".to_string()),
                sections: vec!["https://a.example/world".to_string()],
            },
        );
        let urls = flatten_urls(&seeds);
        assert_eq!(
            urls,
            vec![
                "https://a.example/rss",
                "https://a.example/sitemap.xml",
                "https://a.example/world",
            ]
        );
    }

    #[test]
    fn loads_yaml_mapping() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "example:\n  rss: https://a.example/x\n").unwrap();
        let seeds = load_seeds(f.path()).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds["example"].rss.as_deref(), Some("https://a.example/x"));
    }
}
