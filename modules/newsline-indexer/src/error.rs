use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("watermark i/o error: {0}")]
    Watermark(#[from] std::io::Error),

    #[error(transparent)]
    SearchEngine(#[from] newsline_searchengine::SearchEngineError),

    #[error(transparent)]
    Common(#[from] newsline_common::NewslineError),
}
