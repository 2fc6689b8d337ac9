//! Console and filesystem transport implementations for the CLI.
//!
//! The pipeline publishes the full transcript on every update; the console
//! sink prints only the newly appended tail so the terminal reads as a
//! stream. Delivered PDFs land in the output directory under their
//! sanitized names.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use paperdrop_core::{DocumentSink, ProgressSink, TransportError};
use tracing::info;

/// Prints newly appended transcript lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    seen: usize,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressSink for ConsoleSink {
    async fn publish(&mut self, rendered: &str) -> Result<(), TransportError> {
        for line in rendered[self.seen..].lines().filter(|l| !l.is_empty()) {
            println!("{line}");
        }
        self.seen = rendered.len();
        Ok(())
    }
}

/// Places delivered PDFs in the output directory.
#[derive(Debug)]
pub struct FileDelivery {
    out_dir: PathBuf,
}

impl FileDelivery {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

#[async_trait]
impl DocumentSink for FileDelivery {
    async fn send_document(
        &self,
        path: &Path,
        file_name: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        let destination = self.out_dir.join(file_name);
        tokio::fs::copy(path, &destination)
            .await
            .map_err(|source| TransportError::deliver(path, source))?;
        info!(destination = %destination.display(), "{caption}");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_sink_prints_only_the_new_tail() {
        let mut sink = ConsoleSink::new();
        sink.publish("one").await.unwrap();
        assert_eq!(sink.seen, 3);
        sink.publish("one\ntwo").await.unwrap();
        assert_eq!(sink.seen, 7);
    }

    #[tokio::test]
    async fn test_file_delivery_copies_under_sanitized_name() {
        let work = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let source = work.path().join("deadbeef-Paper.pdf");
        tokio::fs::write(&source, b"%PDF-1.4").await.unwrap();

        let delivery = FileDelivery::new(out.path());
        delivery
            .send_document(&source, "Paper.pdf", "PDF for \"Paper\"")
            .await
            .unwrap();

        let delivered = out.path().join("Paper.pdf");
        assert_eq!(tokio::fs::read(&delivered).await.unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_file_delivery_missing_source_is_a_deliver_error() {
        let out = tempfile::tempdir().unwrap();
        let delivery = FileDelivery::new(out.path());

        let error = delivery
            .send_document(Path::new("/nonexistent/ghost.pdf"), "ghost.pdf", "caption")
            .await
            .unwrap_err();
        assert!(matches!(error, TransportError::Deliver { .. }));
    }
}
