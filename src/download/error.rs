//! Error types for artifact retrieval.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse failure classification so callers can tell retryable causes from
/// non-retryable ones without matching on variant internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport-level failure (DNS, connection, TLS, HTTP error status).
    Network,
    /// Local filesystem failure (create, write, remove).
    Disk,
    /// Anything else (malformed locator, unexpected state).
    Unknown,
}

/// Errors that can occur while fetching a PDF artifact.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error while downloading.
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The artifact URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response from the artifact host.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The artifact URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Filesystem error while writing the artifact.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The record's artifact locator is not a valid URL.
    #[error("invalid artifact URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Classifies this error for retry-policy decisions.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } => FailureKind::Network,
            Self::Io { .. } => FailureKind::Disk,
            Self::InvalidUrl { .. } => FailureKind::Unknown,
        }
    }
}

// No blanket From<reqwest::Error> or From<std::io::Error> impls: the
// variants require context (url, path) that the source errors don't carry,
// so the helper constructors are the conversion surface.
