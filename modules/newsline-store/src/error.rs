use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("bson serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error(transparent)]
    Queue(#[from] newsline_queue::QueueError),

    #[error(transparent)]
    Common(#[from] newsline_common::NewslineError),
}
