//! Error types for the resolution engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while resolving a company name.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// HTTP request to the dataset source failed.
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Dataset source could not be reached or read.
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),

    /// Fetched payload does not parse as a key-to-record dataset.
    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    /// Snapshot cache read or write failed.
    #[error("cache error: {0}")]
    Cache(String),

    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Regex error.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResolverError {
    /// Classify this error for the wire-level reply envelope.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedDataset(_) => ErrorKind::MalformedDataset,
            Self::InvalidConfig(_) | Self::InvalidUrl(_) | Self::Regex(_) => {
                ErrorKind::InvalidConfig
            }
            Self::HttpRequest(_)
            | Self::SourceUnavailable(_)
            | Self::Cache(_)
            | Self::Serialization(_)
            | Self::Io(_) => ErrorKind::SourceUnavailable,
        }
    }
}

/// Wire-level failure classification reported to callers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Network or storage fetch failed or timed out.
    SourceUnavailable,
    /// Payload did not match the expected dataset schema.
    MalformedDataset,
    /// Configuration could not be used.
    InvalidConfig,
}

/// Convenience result alias for resolver operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
