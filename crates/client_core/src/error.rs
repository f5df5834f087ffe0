use shared::error::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid order feed url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to connect order feed {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("nothing selected")]
    NothingSelected,
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion response could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    #[error("completion endpoint unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("board event queue is full; please retry")]
    Full,
    #[error("board is no longer running")]
    Closed,
}
