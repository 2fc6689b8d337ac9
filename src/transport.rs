//! Traits for the outbound message surface.
//!
//! The pipeline never talks to a chat session, terminal, or filesystem
//! directly; it publishes transcript updates through [`ProgressSink`] and
//! hands finished artifacts to a [`DocumentSink`]. Implementations live
//! with the host (the bundled binary provides console/filesystem ones).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Boxed error type for transport implementations.
pub type BoxedTransportCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Publishing a transcript update failed.
    #[error("failed to publish progress update: {source}")]
    Publish {
        /// The underlying transport error.
        #[source]
        source: BoxedTransportCause,
    },

    /// Delivering a document failed.
    #[error("failed to deliver {path}: {source}")]
    Deliver {
        /// The artifact path that could not be delivered.
        path: PathBuf,
        /// The underlying transport error.
        #[source]
        source: BoxedTransportCause,
    },
}

impl TransportError {
    /// Creates a publish error.
    pub fn publish(source: impl Into<BoxedTransportCause>) -> Self {
        Self::Publish {
            source: source.into(),
        }
    }

    /// Creates a delivery error.
    pub fn deliver(path: impl Into<PathBuf>, source: impl Into<BoxedTransportCause>) -> Self {
        Self::Deliver {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Receives the re-rendered transcript after every appended line.
///
/// Each call carries the full accumulated text, so the publish operation is
/// idempotent in content, but it is a distinct observable side effect per
/// call (one call per appended line).
#[async_trait]
pub trait ProgressSink: Send {
    /// Pushes the rendered transcript to the bound message surface.
    async fn publish(&mut self, rendered: &str) -> Result<(), TransportError>;
}

/// Receives finished artifacts for delivery.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Delivers the file at `path` under `file_name` with a caption.
    async fn send_document(
        &self,
        path: &Path,
        file_name: &str,
        caption: &str,
    ) -> Result<(), TransportError>;
}
