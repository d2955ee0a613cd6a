use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchEngineError>;

#[derive(Debug, Error)]
pub enum SearchEngineError {
    #[error("network error: {0}")]
    Network(String),

    #[error("search engine returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("document not found")]
    NotFound,

    #[error("bulk import partially failed: {0}")]
    ImportFailed(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchEngineError {
    fn from(err: reqwest::Error) -> Self {
        SearchEngineError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SearchEngineError {
    fn from(err: serde_json::Error) -> Self {
        SearchEngineError::Parse(err.to_string())
    }
}
