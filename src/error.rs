// error.rs
// Error types surfaced by TShock REST requests

use thiserror::Error;

/// Failure modes of a single REST call.
#[derive(Debug, Error)]
pub enum RestError {
    /// The client configuration was rejected at construction time.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS failure,
    /// connection refused, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("malformed JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RestError {
    /// HTTP status carried by an [`RestError::Api`] failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
