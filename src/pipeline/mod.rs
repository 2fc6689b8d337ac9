//! Single-reference and batch pipeline orchestration.
//!
//! One reference flows through a strictly linear state machine: classify,
//! search, download, deliver, with a transcript line published at every
//! transition and the transient artifact removed on every exit path. A
//! batch runs the same pipeline per title, sequentially, isolating each
//! item's failures so the run always reaches the last entry.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::arxiv::{ArxivClient, SearchError};
use crate::bibtex::BatchJob;
use crate::classify::{ClassifiedQuery, classify};
use crate::download::{PdfFetcher, sanitize_title};
use crate::transcript::ProgressReporter;
use crate::transport::{DocumentSink, ProgressSink, TransportError};

/// Errors that escape a pipeline run.
///
/// Fetch and delivery failures never appear here: they are recovered inside
/// the run and reported as transcript lines. What remains is a failed
/// search call (fatal to a single-reference run, per-item recovered in a
/// batch) and loss of the progress surface itself (always fatal).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The search request itself failed (distinct from zero results).
    #[error(transparent)]
    Search(#[from] SearchError),

    /// The progress surface or delivery transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Terminal state of one reference's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The PDF was fetched and handed to the document sink.
    Delivered,
    /// The search returned zero results; no artifact was produced.
    NotFound,
    /// The download or delivery failed; reported in the transcript.
    Failed,
}

/// Outcome counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Items whose PDF was delivered.
    pub delivered: usize,
    /// Items the search could not match.
    pub not_found: usize,
    /// Items skipped for having no title.
    pub skipped: usize,
    /// Items that failed during search, download, or delivery.
    pub failed: usize,
}

impl BatchStats {
    /// Total items accounted for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.delivered + self.not_found + self.skipped + self.failed
    }
}

/// Composes classifier, resolver, fetcher, and transports for one session.
///
/// Collaborators are injected per run; the pipeline holds no global state
/// and two pipelines never share a transcript or an artifact.
pub struct Pipeline<'a> {
    resolver: &'a ArxivClient,
    fetcher: &'a PdfFetcher,
    documents: &'a dyn DocumentSink,
    work_dir: PathBuf,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline writing transient artifacts under `work_dir`.
    pub fn new(
        resolver: &'a ArxivClient,
        fetcher: &'a PdfFetcher,
        documents: &'a dyn DocumentSink,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            documents,
            work_dir: work_dir.into(),
        }
    }

    /// Runs the full pipeline for one user-supplied reference.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the search call fails or the progress
    /// surface is lost. Zero results and download/delivery failures are not
    /// errors; they end the run with the matching [`ItemOutcome`].
    #[instrument(level = "debug", skip(self, reporter))]
    pub async fn process_reference<S: ProgressSink>(
        &self,
        reference: &str,
        reporter: &mut ProgressReporter<S>,
    ) -> Result<ItemOutcome, PipelineError> {
        self.process_item(reference, "", reporter).await
    }

    /// Runs the batch pipeline over a bibliography-derived job.
    ///
    /// Items run sequentially, 1-indexed, every line prefixed `[i/N]`, all
    /// appended to the one shared transcript. A per-item failure is
    /// recorded and the next item is always attempted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Transport`] only when the progress surface
    /// itself is lost; nothing else escapes the batch boundary.
    #[instrument(level = "debug", skip(self, job, reporter), fields(total = job.total()))]
    pub async fn run_batch<S: ProgressSink>(
        &self,
        job: &BatchJob,
        reporter: &mut ProgressReporter<S>,
    ) -> Result<BatchStats, PipelineError> {
        let mut stats = BatchStats::default();

        if job.is_empty() {
            reporter
                .append_and_publish("No entries found in the bibliography.")
                .await?;
            return Ok(stats);
        }

        let total = job.total();
        reporter
            .append_and_publish(format!(
                "Found {total} entries in the bibliography. Starting processing..."
            ))
            .await?;

        for (index, title) in job.items.iter().enumerate() {
            let position = index + 1;
            let prefix = format!("[{position}/{total}] ");
            let title = title.trim();

            if title.is_empty() {
                reporter
                    .append_and_publish(format!(
                        "{prefix}No title found for this entry, skipping."
                    ))
                    .await?;
                stats.skipped += 1;
                continue;
            }

            match self.process_item(title, &prefix, reporter).await {
                Ok(ItemOutcome::Delivered) => stats.delivered += 1,
                Ok(ItemOutcome::NotFound) => stats.not_found += 1,
                Ok(ItemOutcome::Failed) => stats.failed += 1,
                // Loss of the progress surface is fatal to the whole session.
                Err(PipelineError::Transport(e)) => return Err(PipelineError::Transport(e)),
                Err(e) => {
                    warn!(title = %title, error = %e, "batch item failed");
                    reporter
                        .append_and_publish(format!(
                            "{prefix}Error processing \"{title}\": {e}"
                        ))
                        .await?;
                    stats.failed += 1;
                }
            }
        }

        debug!(?stats, "batch complete");
        Ok(stats)
    }

    /// The linear state machine for one reference.
    async fn process_item<S: ProgressSink>(
        &self,
        reference: &str,
        prefix: &str,
        reporter: &mut ProgressReporter<S>,
    ) -> Result<ItemOutcome, PipelineError> {
        reporter
            .append_and_publish(format!("{prefix}Checking input..."))
            .await?;

        let query = classify(reference);
        match &query {
            ClassifiedQuery::ExplicitId { id, origin } => {
                reporter
                    .append_and_publish(format!("{prefix}Detected arXiv ID from {origin}: {id}"))
                    .await?;
            }
            ClassifiedQuery::FreeText { .. } => {
                reporter
                    .append_and_publish(format!(
                        "{prefix}No arXiv ID found. Using the full text as title search."
                    ))
                    .await?;
            }
        }

        reporter
            .append_and_publish(format!("{prefix}Searching for paper..."))
            .await?;

        let Some(record) = self.resolver.resolve(&query).await? else {
            reporter
                .append_and_publish(format!("{prefix}No results found for the given input."))
                .await?;
            return Ok(ItemOutcome::NotFound);
        };

        reporter
            .append_and_publish(format!(
                "{prefix}Found paper: \"{}\". Starting PDF download...",
                record.title
            ))
            .await?;

        let filename = sanitize_title(&record.title);
        let artifact = match self.fetcher.fetch(&record, &self.work_dir, &filename).await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(title = %record.title, error = %e, kind = ?e.kind(), "download failed");
                reporter
                    .append_and_publish(format!(
                        "{prefix}Error processing file for \"{}\": {e}",
                        record.title
                    ))
                    .await?;
                return Ok(ItemOutcome::Failed);
            }
        };

        reporter
            .append_and_publish(format!("{prefix}Download complete. Sending PDF..."))
            .await?;

        let caption = format!("{prefix}PDF for \"{}\"", record.title);
        let delivery = self
            .documents
            .send_document(artifact.path(), artifact.file_name(), &caption)
            .await;

        // The artifact is removed on both exit paths before the run ends.
        artifact.remove().await;

        match delivery {
            Ok(()) => Ok(ItemOutcome::Delivered),
            Err(e) => {
                warn!(title = %record.title, error = %e, "delivery failed");
                reporter
                    .append_and_publish(format!(
                        "{prefix}Error processing file for \"{}\": {e}",
                        record.title
                    ))
                    .await?;
                Ok(ItemOutcome::Failed)
            }
        }
    }
}
