//! Error types for the ThreatConnect client

use thiserror::Error;

/// Errors returned by client operations
#[derive(Debug, Error)]
pub enum TcError {
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("resource type {0} does not describe an indicator")]
    NotAnIndicator(String),

    #[error("cannot infer hash algorithm from a value of length {length} (expected 32, 40 or 64)")]
    AmbiguousHashLength { length: usize },

    #[error("file hash {0:?} is not hexadecimal")]
    InvalidHash(String),

    #[error("{0} indicator has no value")]
    MissingIndicatorValue(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ThreatConnect API error: {status} - {body} ({url})")]
    Status { status: u16, url: String, body: String },

    #[error("failed to parse response from {url}")]
    UnparsableBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize request body")]
    Serialization(#[source] serde_json::Error),

    #[error("invalid API base path {base:?}")]
    InvalidBasePath {
        base: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base path {0:?} cannot carry path segments")]
    UnsupportedBasePath(String),

    #[error("empty path segment")]
    InvalidPathSegment,

    #[error("no space element id available in this environment")]
    MissingSpaceElement,

    #[error("invalid resource type registry: {0}")]
    InvalidRegistry(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type TcResult<T> = Result<T, TcError>;
