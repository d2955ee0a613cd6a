use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewslineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("queue error: {0}")]
    Queue(String),

    #[error("document store error: {0}")]
    Store(String),

    #[error("search engine error: {0}")]
    SearchEngine(String),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, NewslineError>;
