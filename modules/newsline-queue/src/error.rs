use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("broker connection error: {0}")]
    Connection(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("malformed message body: {0}")]
    MalformedBody(String),
}

impl From<lapin::Error> for QueueError {
    fn from(err: lapin::Error) -> Self {
        QueueError::Connection(err.to_string())
    }
}
