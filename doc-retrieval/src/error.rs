//! Typed error for the doc-retrieval crate.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Required configuration value is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// Configuration value could not be parsed or is out of range.
    #[error("invalid value in {var}: {reason}")]
    InvalidConfig {
        var: &'static str,
        reason: String,
    },

    /// The API key cannot be carried in an HTTP header.
    #[error("API key is not a valid header value")]
    InvalidApiKey,

    /// HTTP/transport errors (connect, DNS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with something other than 200.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: StatusCode, url: String },
}
