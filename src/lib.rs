//! Paperdrop Core Library
//!
//! This library resolves user-supplied references (free text, an arXiv DOI,
//! an arXiv URL, or titles extracted from a bibliography) to papers on arXiv
//! and retrieves each paper's PDF, reporting progress as an append-only
//! transcript that is re-published after every stage.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`classify`] - Input classification (explicit arXiv id vs free text)
//! - [`arxiv`] - Search client for the arXiv query API
//! - [`download`] - Filename sanitization and streaming PDF retrieval
//! - [`transcript`] - Append-only progress transcript and publishing
//! - [`transport`] - Traits for the outbound message/document surface
//! - [`pipeline`] - Single-reference and batch orchestration
//! - [`bibtex`] - Title extraction from BibTeX input

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arxiv;
pub mod bibtex;
pub mod classify;
pub mod download;
pub mod pipeline;
pub mod transcript;
pub mod transport;

// Re-export commonly used types
pub use arxiv::{ArxivClient, PaperRecord, SearchError};
pub use bibtex::BatchJob;
pub use classify::{ClassifiedQuery, IdOrigin, classify};
pub use download::{FailureKind, FetchError, LocalArtifact, PdfFetcher, sanitize_title};
pub use pipeline::{BatchStats, ItemOutcome, Pipeline, PipelineError};
pub use transcript::{ProgressReporter, ProgressTranscript};
pub use transport::{DocumentSink, ProgressSink, TransportError};
