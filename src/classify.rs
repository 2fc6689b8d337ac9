//! Classification of raw references into explicit arXiv ids or free text.
//!
//! Every input classifies to some variant; classification never fails.
//! The DOI pattern is tried before the URL pattern, and anything that
//! matches neither falls back to a trimmed free-text query.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Regex pattern for arXiv DOIs: `10.48550/arXiv.<id>` with optional `vN` suffix.
/// The dot after `arXiv` is optional to tolerate sloppy citations.
#[allow(clippy::expect_used)]
static DOI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)10\.48550/arXiv\.?([\d.]+?)\.?(v\d+)?(?:[^\d.]|$)")
        .expect("arXiv DOI regex is valid") // Static pattern, safe to panic
});

/// Regex pattern for arXiv URLs: `arxiv.org/abs/<id>` or `arxiv.org/pdf/<id>`,
/// optional `vN` suffix.
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)arxiv\.org/(?:abs|pdf)/([\d.]+?)\.?(v\d+)?(?:[^\d.]|$)")
        .expect("arXiv URL regex is valid") // Static pattern, safe to panic
});

/// Which pattern recovered an explicit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdOrigin {
    /// Recovered from a `10.48550/arXiv.*` DOI.
    Doi,
    /// Recovered from an `arxiv.org/{abs,pdf}/*` URL.
    Url,
}

impl fmt::Display for IdOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doi => write!(f, "DOI"),
            Self::Url => write!(f, "URL"),
        }
    }
}

/// A raw reference classified for resolution.
///
/// Derived deterministically from the input string and immutable once
/// produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedQuery {
    /// A canonical arXiv identifier was recovered from the input.
    ExplicitId {
        /// The bare identifier, version suffix stripped (e.g. `2301.00001`).
        id: String,
        /// Which pattern fired.
        origin: IdOrigin,
    },
    /// No identifier found; the whole input becomes a search query.
    FreeText {
        /// The input, trimmed of surrounding whitespace.
        text: String,
    },
}

/// Classifies a raw reference string.
///
/// Applies two case-insensitive pattern tests in order (DOI form, then URL
/// form) and falls back to a free-text query when neither matches. An
/// optional version suffix (`v2`) on an identifier is ignored.
///
/// # Examples
///
/// ```
/// use paperdrop_core::classify::{ClassifiedQuery, IdOrigin, classify};
///
/// let query = classify("10.48550/arXiv.2301.00001v2");
/// assert_eq!(
///     query,
///     ClassifiedQuery::ExplicitId { id: "2301.00001".to_string(), origin: IdOrigin::Doi }
/// );
/// ```
#[must_use]
pub fn classify(raw: &str) -> ClassifiedQuery {
    if let Some(cap) = DOI_PATTERN.captures(raw) {
        let id = cap[1].trim_end_matches('.').to_string();
        debug!(id = %id, "detected arXiv id from DOI");
        return ClassifiedQuery::ExplicitId {
            id,
            origin: IdOrigin::Doi,
        };
    }

    if let Some(cap) = URL_PATTERN.captures(raw) {
        let id = cap[1].trim_end_matches('.').to_string();
        debug!(id = %id, "detected arXiv id from URL");
        return ClassifiedQuery::ExplicitId {
            id,
            origin: IdOrigin::Url,
        };
    }

    debug!("no arXiv id found, falling back to free-text query");
    ClassifiedQuery::FreeText {
        text: raw.trim().to_string(),
    }
}
