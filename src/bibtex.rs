//! Title extraction from BibTeX input.
//!
//! Full bibliographic parsing is out of scope (a dedicated reader owns
//! that); the batch pipeline only needs an ordered sequence of titles. This
//! module segments `@type{...}` blocks with a brace/quote-aware scanner and
//! pulls the `title` field out of each one. An entry without a usable title
//! contributes an empty slot so the batch can report it as skipped instead
//! of silently renumbering.

use tracing::{debug, trace};

/// Block types that carry no citable entry.
const IGNORED_BLOCK_TYPES: [&str; 3] = ["comment", "preamble", "string"];

/// An ordered batch of title references parsed from a bibliography source.
///
/// Consumed read-only, one item at a time, by the batch pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchJob {
    /// One title per bibliography entry, in source order. Entries whose
    /// title could not be extracted hold an empty string.
    pub items: Vec<String>,
}

impl BatchJob {
    /// Creates a job from an ordered sequence of titles.
    #[must_use]
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    /// Number of entries in the job.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// True when the bibliography produced no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Extracts entry titles from BibTeX text into a [`BatchJob`].
#[must_use]
pub fn extract_titles(input: &str) -> BatchJob {
    let mut items = Vec::new();

    for segment in segment_entries(input) {
        let Some((entry_type, body)) = split_entry(&segment) else {
            trace!(segment = %preview(&segment), "skipping malformed segment");
            continue;
        };
        if IGNORED_BLOCK_TYPES.contains(&entry_type.as_str()) {
            continue;
        }
        let title = extract_title_field(body).unwrap_or_default();
        trace!(entry_type = %entry_type, title = %title, "extracted entry");
        items.push(title);
    }

    debug!(entries = items.len(), "parsed bibliography input");
    BatchJob::new(items)
}

/// Splits raw input into `@type{...}` segments, tolerating junk between
/// entries. Quoted strings and nested braces inside a body do not end it.
fn segment_entries(input: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut entries = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i].1 != '@' {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && chars[j].1.is_ascii_alphabetic() {
            j += 1;
        }
        while j < chars.len() && chars[j].1.is_whitespace() {
            j += 1;
        }
        if j >= chars.len() || chars[j].1 != '{' {
            i += 1;
            continue;
        }

        let start = chars[i].0;
        let mut depth = 0usize;
        let mut in_quotes = false;
        let mut escape = false;
        let mut found_end = None;

        for (k, (_, ch)) in chars.iter().enumerate().skip(j) {
            if escape {
                escape = false;
                continue;
            }
            match ch {
                '\\' => escape = true,
                '"' => in_quotes = !in_quotes,
                '{' if !in_quotes => depth += 1,
                '}' if !in_quotes => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        found_end = Some(k);
                        break;
                    }
                }
                _ => {}
            }
        }

        if let Some(end_index) = found_end {
            let end_exclusive = if end_index + 1 < chars.len() {
                chars[end_index + 1].0
            } else {
                input.len()
            };
            entries.push(input[start..end_exclusive].trim().to_string());
            i = end_index + 1;
        } else {
            // Unbalanced entry at end of input; take what is there.
            entries.push(input[start..].trim().to_string());
            break;
        }
    }

    entries
}

/// Splits a segment into its lowercased entry type and brace body.
fn split_entry(segment: &str) -> Option<(String, &str)> {
    let after_at = segment.strip_prefix('@')?;
    let brace_pos = after_at.find('{')?;
    let entry_type = after_at[..brace_pos].trim().to_ascii_lowercase();
    let body = &after_at[brace_pos + 1..];
    let body = body.strip_suffix('}').unwrap_or(body);
    Some((entry_type, body))
}

/// Extracts the value of the `title` field from an entry body.
///
/// Handles `title = {...}` with nested braces and `title = "..."`; inner
/// grouping braces are dropped from the value.
fn extract_title_field(body: &str) -> Option<String> {
    let lower = body.to_ascii_lowercase();
    let mut search_from = 0usize;

    let field_pos = loop {
        let rel = lower[search_from..].find("title")?;
        let pos = search_from + rel;
        // Reject longer field names that merely end in "title" (booktitle).
        let preceded_by_word = pos > 0
            && lower.as_bytes()[pos - 1]
                .is_ascii_alphanumeric();
        let rest = lower[pos + "title".len()..].trim_start();
        if !preceded_by_word && rest.starts_with('=') {
            break pos;
        }
        search_from = pos + "title".len();
    };

    let after_eq = body[field_pos + "title".len()..].trim_start();
    let after_eq = after_eq.strip_prefix('=')?.trim_start();

    let mut value = String::new();
    let mut chars = after_eq.chars();
    match chars.next()? {
        '{' => {
            let mut depth = 1usize;
            for ch in chars {
                match ch {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => value.push(ch),
                }
            }
        }
        '"' => {
            for ch in chars {
                if ch == '"' {
                    break;
                }
                if ch != '{' && ch != '}' {
                    value.push(ch);
                }
            }
        }
        first => {
            // Bare value; runs until the field separator.
            value.push(first);
            for ch in chars {
                if ch == ',' || ch == '\n' {
                    break;
                }
                value.push(ch);
            }
        }
    }

    let title = value.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

fn preview(segment: &str) -> String {
    segment.chars().take(40).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_titles_from_braced_fields() {
        let input = r"
@article{vaswani2017,
  author = {Vaswani, Ashish and others},
  title  = {Attention Is All You Need},
  year   = {2017}
}
@inproceedings{he2016,
  title = {Deep Residual Learning for {Image} Recognition},
  booktitle = {CVPR}
}
";
        let job = extract_titles(input);
        assert_eq!(job.total(), 2);
        assert_eq!(job.items[0], "Attention Is All You Need");
        assert_eq!(job.items[1], "Deep Residual Learning for Image Recognition");
    }

    #[test]
    fn test_extract_titles_from_quoted_field() {
        let input = r#"@book{k, title = "The Art of Computer Programming", year = 1968}"#;
        let job = extract_titles(input);
        assert_eq!(job.items, vec!["The Art of Computer Programming".to_string()]);
    }

    #[test]
    fn test_entry_without_title_yields_empty_slot() {
        let input = r"
@article{a, title = {First}}
@article{b, author = {Nobody}}
@article{c, title = {Third}}
";
        let job = extract_titles(input);
        assert_eq!(job.items, vec!["First".to_string(), String::new(), "Third".to_string()]);
    }

    #[test]
    fn test_booktitle_is_not_mistaken_for_title() {
        let input = r"@inproceedings{x, booktitle = {Some Venue}, title = {Real Title}}";
        let job = extract_titles(input);
        assert_eq!(job.items, vec!["Real Title".to_string()]);
    }

    #[test]
    fn test_comment_preamble_and_string_blocks_are_ignored() {
        let input = r#"
@comment{just a note}
@string{venue = "NeurIPS"}
@preamble{"\newcommand{\x}{y}"}
@article{real, title = {Kept}}
"#;
        let job = extract_titles(input);
        assert_eq!(job.items, vec!["Kept".to_string()]);
    }

    #[test]
    fn test_empty_input_is_empty_job() {
        let job = extract_titles("not bibtex at all");
        assert!(job.is_empty());
        assert_eq!(job.total(), 0);
    }

    #[test]
    fn test_title_whitespace_is_collapsed() {
        let input = "@article{a, title = {Folded\n    Across Lines}}";
        let job = extract_titles(input);
        assert_eq!(job.items, vec!["Folded Across Lines".to_string()]);
    }
}
