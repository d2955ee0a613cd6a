use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    SearchEngine(newsline_searchengine::SearchEngineError),

    #[error("document not found")]
    NotFound,

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Common(#[from] newsline_common::NewslineError),
}

/// A Typesense 404 maps to our own `NotFound` rather than the blanket
/// `SearchEngine` variant, so a missing document surfaces as 404 to
/// callers instead of 500 (spec §4.4's click-on-unknown-doc behavior).
impl From<newsline_searchengine::SearchEngineError> for SearchError {
    fn from(err: newsline_searchengine::SearchEngineError) -> Self {
        match err {
            newsline_searchengine::SearchEngineError::NotFound => SearchError::NotFound,
            other => SearchError::SearchEngine(other),
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            SearchError::NotFound => StatusCode::NOT_FOUND,
            SearchError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::Database(_) | SearchError::SearchEngine(_) | SearchError::Common(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
