use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid seed url {url}: {source}")]
    InvalidUrl { url: String, #[source] source: url::ParseError },

    #[error("http request to {url} failed: {source}")]
    Http { url: String, #[source] source: reqwest::Error },

    #[error("non-success status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Queue(#[from] newsline_queue::QueueError),

    #[error(transparent)]
    Common(#[from] newsline_common::NewslineError),
}
