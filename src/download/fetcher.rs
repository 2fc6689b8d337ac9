//! Streaming retrieval of PDF artifacts with guaranteed cleanup.
//!
//! The fetcher writes the PDF to a token-scoped transient path. On any
//! failure the partial file is removed before the error propagates; on
//! success the returned [`LocalArtifact`] owns the path and is removed by
//! the pipeline once delivery has been attempted.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::FetchError;
use super::filename::{fetch_token, scoped_path};
use crate::arxiv::PaperRecord;

/// A transient PDF file scoped to one pipeline run.
///
/// The artifact exists only between a successful fetch and the end of the
/// owning pipeline run. [`LocalArtifact::remove`] is the normal exit; `Drop`
/// is a backstop so the file cannot outlive the run even on an early return.
#[derive(Debug)]
pub struct LocalArtifact {
    path: PathBuf,
    file_name: String,
    removed: bool,
}

impl LocalArtifact {
    fn new(path: PathBuf, file_name: impl Into<String>) -> Self {
        Self {
            path,
            file_name: file_name.into(),
            removed: false,
        }
    }

    /// The transient on-disk location (carries the per-fetch token).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The delivery file name (sanitized title, no token).
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Removes the artifact from disk.
    ///
    /// Checked defensively: a file that was never written (or was already
    /// removed) is not an error. Other removal failures are logged and
    /// swallowed so cleanup never masks the pipeline outcome.
    pub async fn remove(mut self) {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "removed artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove artifact"),
        }
    }
}

impl Drop for LocalArtifact {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Downloads PDF artifacts to token-scoped transient paths.
#[derive(Debug, Clone, Default)]
pub struct PdfFetcher {
    client: reqwest::Client,
}

impl PdfFetcher {
    /// Creates a fetcher with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the record's PDF into `dir` under a token-scoped name.
    ///
    /// Exactly one attempt, no retry. On failure any partially written file
    /// is removed before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the artifact locator is invalid, the
    /// download fails at the transport level, the host answers with a
    /// non-success status, or the file cannot be written.
    #[instrument(level = "debug", skip(self, record), fields(id = %record.id))]
    pub async fn fetch(
        &self,
        record: &PaperRecord,
        dir: &Path,
        filename: &str,
    ) -> Result<LocalArtifact, FetchError> {
        let url = &record.pdf_url;
        if Url::parse(url).is_err() {
            return Err(FetchError::invalid_url(url));
        }

        let path = scoped_path(dir, &fetch_token(), filename);
        debug!(url = %url, path = %path.display(), "downloading artifact");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::network(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let file = File::create(&path)
            .await
            .map_err(|source| FetchError::io(&path, source))?;
        let mut writer = BufWriter::new(file);
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(source) => {
                    remove_partial(&path).await;
                    return Err(FetchError::network(url, source));
                }
            };
            if let Err(source) = writer.write_all(&chunk).await {
                remove_partial(&path).await;
                return Err(FetchError::io(&path, source));
            }
            bytes_written += chunk.len() as u64;
        }

        if let Err(source) = writer.flush().await {
            remove_partial(&path).await;
            return Err(FetchError::io(&path, source));
        }

        debug!(bytes = bytes_written, path = %path.display(), "download complete");
        Ok(LocalArtifact::new(path, filename))
    }
}

/// Best-effort removal of a partially written file.
async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove partial file");
        }
    }
}
