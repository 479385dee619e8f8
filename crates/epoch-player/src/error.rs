//! Player error types.

use epoch_db::error::DatabaseError;
use thiserror::Error;

/// Errors from loading timeline data, over HTTP or from a local store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, bad body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} ({status})")]
    Status {
        status: u16,
        /// The server's `error` message, or the status reason.
        message: String,
    },

    /// The configured base URL is unusable.
    #[error("invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Reading the local store failed.
    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl ClientError {
    /// One line suitable for showing in place of the timeline.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Self::Http(e) if e.is_connect() => "Could not reach the server".to_string(),
            other => other.to_string(),
        }
    }
}
