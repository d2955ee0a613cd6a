use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct CollectionField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_dim: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSchema {
    pub name: &'static str,
    pub fields: Vec<CollectionField>,
    pub default_sorting_field: &'static str,
}

/// The `news` collection schema, per spec §4.3.
pub fn news_schema() -> CollectionSchema {
    CollectionSchema {
        name: "news",
        fields: vec![
            CollectionField { name: "id", field_type: "string", facet: None, num_dim: None },
            CollectionField { name: "title", field_type: "string", facet: None, num_dim: None },
            CollectionField { name: "body", field_type: "string", facet: None, num_dim: None },
            CollectionField { name: "source", field_type: "string", facet: Some(true), num_dim: None },
            CollectionField { name: "tags", field_type: "string[]", facet: Some(true), num_dim: None },
            CollectionField { name: "published_at", field_type: "int64", facet: Some(true), num_dim: None },
            CollectionField {
                name: "vec",
                field_type: "float[]",
                facet: None,
                num_dim: Some(newsline_common::EMBEDDING_DIM),
            },
        ],
        default_sorting_field: "published_at",
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// One hit in a search result. The document is kept as raw JSON so extra
/// fields (e.g. `score` spliced in for a blended result) pass through
/// untouched, per spec §6 ("Hit entries pass through the search engine's
/// shape, augmented with a score field when blending is applied").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub document: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchHit {
    pub fn document_id(&self) -> Option<&str> {
        self.document.get("id").and_then(|v| v.as_str())
    }

    /// The ranking score used for blending: vector distance for semantic
    /// hits (converted to a similarity), text-match for keyword hits.
    pub fn base_score(&self) -> f64 {
        if let Some(d) = self.vector_distance {
            1.0 - d
        } else if let Some(t) = self.text_match {
            t
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub found: i64,
    pub hits: Vec<SearchHit>,
    pub page: i64,
    pub request_params: serde_json::Value,
    pub search_time_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}
