//! Error types shared by the fetch, notify and configuration layers.
//!
//! Only configuration errors are fatal. Everything else is caught at the
//! call site that owns the external boundary, logged, and turned into a
//! partial result.

use thiserror::Error;

/// Errors surfaced by the digest pipeline's I/O edges.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The HTTP request itself failed (DNS, TLS, timeout, connection reset).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A CSS selector in an HTML layout failed to parse.
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// The configuration is structurally valid YAML but semantically wrong.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;
