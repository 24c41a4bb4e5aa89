mod client;
mod types;

pub use crate::{
    client::{
        save_as_json,
        Client,
        ClientBuilder,
    },
    types::SearchQuery,
};

/// Library error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reqwest HTTP Error
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// The api returned a bad status
    #[error("invalid status {}, message: {}", .status, .message.as_deref().unwrap_or("unknown error"))]
    InvalidStatus {
        /// The status code
        status: reqwest::StatusCode,

        /// The message the api sent in the error body, if it could be decoded
        message: Option<String>,
    },

    /// Invalid JSON
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("{0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Io Error
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get this error rendered as a single message string.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
