//! PDF artifact retrieval: filename sanitization, scoped transient paths,
//! and streaming downloads with guaranteed cleanup.

mod error;
mod fetcher;
mod filename;

pub use error::{FailureKind, FetchError};
pub use fetcher::{LocalArtifact, PdfFetcher};
pub use filename::{fetch_token, sanitize_title, scoped_path};
