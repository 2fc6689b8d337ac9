//! Search client for the arXiv query API.
//!
//! The resolver performs exactly one search request per classified query and
//! returns at most one matched paper. There is deliberately no fuzzy
//! fallback: zero results means `None`, and a transport-level failure is a
//! typed error, never `None`.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::classify::ClassifiedQuery;

/// Default base URL of the arXiv export API.
pub const DEFAULT_BASE_URL: &str = "http://export.arxiv.org";

/// The resolver only ever wants the single best match.
const MAX_RESULTS: usize = 1;

/// Errors that can occur while resolving a query against the search service.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network-level error (DNS, connection, TLS, timeout).
    #[error("network error querying {url}: {source}")]
    Network {
        /// The query URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The search service answered with a non-success HTTP status.
    #[error("search service returned HTTP {status} for {url}")]
    HttpStatus {
        /// The query URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The Atom feed in the response body could not be deserialized.
    #[error("malformed search response: {source}")]
    Parse {
        /// The underlying deserialization error.
        #[source]
        source: quick_xml::DeError,
    },
}

/// A resolved paper: the title, its bare arXiv identifier, and the PDF URL.
///
/// Owned exclusively by the pipeline invocation that fetched it; records are
/// never cached or shared across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    /// Paper title with internal whitespace collapsed.
    pub title: String,
    /// Bare arXiv identifier, version suffix stripped (e.g. `2301.00001`).
    pub id: String,
    /// Direct URL of the PDF artifact.
    pub pdf_url: String,
}

/// Internal representation of the arXiv API's Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

/// One paper entry from the Atom feed. Only the fields the pipeline needs.
#[derive(Debug, Deserialize)]
struct Entry {
    /// Paper title (may contain LaTeX markup and folded line breaks).
    title: String,
    /// arXiv abstract URL (e.g. `http://arxiv.org/abs/2301.00001v1`).
    #[serde(rename = "id")]
    abs_url: String,
}

/// Client for the arXiv query API.
///
/// A client handle is cheap to clone and is injected into the pipeline per
/// run rather than held as process-global state. The base URL is
/// configurable so tests can point the client at a local mock server.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    /// Creates a client against the public arXiv API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against an alternate API host (mock servers in tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a classified query to at most one paper record.
    ///
    /// Issues exactly one search request: an exact-identifier search for
    /// [`ClassifiedQuery::ExplicitId`], a free-text search otherwise.
    /// Returns `Ok(None)` when the service reports zero results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the request fails at the transport
    /// level, the service answers with a non-success status, or the Atom
    /// response cannot be parsed.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve(
        &self,
        query: &ClassifiedQuery,
    ) -> Result<Option<PaperRecord>, SearchError> {
        let search_query = match query {
            ClassifiedQuery::ExplicitId { id, .. } => format!("id:{id}"),
            ClassifiedQuery::FreeText { text } => text.clone(),
        };
        let url = format!(
            "{}/api/query?search_query={}&max_results={MAX_RESULTS}",
            self.base_url,
            urlencoding::encode(&search_query),
        );
        debug!(url = %url, "querying search service");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SearchError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SearchError::Network {
                url: url.clone(),
                source,
            })?;

        let feed: Feed =
            quick_xml::de::from_str(&body).map_err(|source| SearchError::Parse { source })?;

        Ok(feed.entries.into_iter().next().map(record_from_entry))
    }
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a feed entry into a [`PaperRecord`].
///
/// The bare identifier is the tail of the abstract URL with any version
/// suffix stripped; the PDF URL is derived from the abstract URL.
fn record_from_entry(entry: Entry) -> PaperRecord {
    let id = entry
        .abs_url
        .rsplit("/abs/")
        .next()
        .unwrap_or(&entry.abs_url);
    let id = strip_version(id).to_string();

    let pdf_url = entry.abs_url.replace("/abs/", "/pdf/") + ".pdf";
    let title = entry.title.split_whitespace().collect::<Vec<_>>().join(" ");

    PaperRecord { title, id, pdf_url }
}

/// Strips a trailing `vN` version suffix from an arXiv identifier.
fn strip_version(id: &str) -> &str {
    match id.rsplit_once('v') {
        Some((bare, version)) if !version.is_empty() && version.bytes().all(|b| b.is_ascii_digit()) => {
            bare
        }
        _ => id,
    }
}
