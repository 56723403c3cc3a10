// ================================================================
// File: autolive-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// One or more required settings are absent or still hold their placeholder.
    #[error("Configuration missing: {}", .0.join(", "))]
    ConfigurationMissing(Vec<String>),

    /// The request could not be built (malformed URI, bad header value).
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// DNS, connect, or timeout failure while talking to `url`.
    #[error("Transport error contacting [{url}]: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body did not decode into the expected shape.
    #[error("Unexpected response from [{url}]: {reason}")]
    UnexpectedResponse {
        url: String,
        reason: String,
        body: String,
    },

    /// Non-success status carrying an XRPC error body.
    #[error("XRPC error from [{url}]: HTTP {status} => {error}: {message}")]
    Xrpc {
        url: String,
        status: u16,
        error: String,
        message: String,
    },

    #[error("Broadcaster unavailable: {0}")]
    BroadcasterUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Raw response body attached to the error, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::UnexpectedResponse { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}
