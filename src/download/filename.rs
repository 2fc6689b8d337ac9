//! Filename sanitization and scoped-path derivation for PDF artifacts.

use std::path::{Path, PathBuf};

/// Characters never allowed in a derived filename.
const FORBIDDEN: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Maximum length of the sanitized stem, before the `.pdf` extension.
const MAX_STEM_CHARS: usize = 100;

/// Derives a safe, bounded-length filename from a paper title.
///
/// Strips every character in the forbidden set, trims surrounding
/// whitespace, replaces each remaining whitespace run with a single
/// underscore, truncates to 100 characters, and appends `.pdf`. Pure and
/// deterministic; the same title always yields the same filename.
///
/// # Examples
///
/// ```
/// use paperdrop_core::download::sanitize_title;
///
/// assert_eq!(sanitize_title("A/B: Study?"), "AB_Study.pdf");
/// ```
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let stem: String = cleaned
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    format!("{stem}.pdf")
}

/// Derives the transient on-disk location for one fetch.
///
/// The path combines a per-fetch token with the sanitized filename so that
/// two in-flight downloads of identically titled papers never share a path.
/// Only this transient path carries the token; the delivered file name stays
/// the sanitized title.
#[must_use]
pub fn scoped_path(dir: &Path, token: &str, filename: &str) -> PathBuf {
    dir.join(format!("{token}-{filename}"))
}

/// Generates a fresh per-fetch token.
#[must_use]
pub fn fetch_token() -> String {
    format!("{:08x}", rand::random::<u32>())
}
