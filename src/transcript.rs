//! Append-only progress transcript bound to one message surface.
//!
//! The transcript accumulates human-readable status lines; the rendered
//! string is always the concatenation of every line appended so far, in
//! order. Once published a line is never retracted or reordered, only
//! extended. One transcript belongs to exactly one pipeline run (or one
//! whole batch) and is mutated by nothing else.

use tracing::trace;

use crate::transport::{ProgressSink, TransportError};

/// Ordered, append-only sequence of status lines.
#[derive(Debug, Default)]
pub struct ProgressTranscript {
    lines: Vec<String>,
}

impl ProgressTranscript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one status line.
    pub fn append(&mut self, line: impl Into<String>) {
        let line = line.into();
        trace!(line = %line, "transcript append");
        self.lines.push(line);
    }

    /// Renders the full transcript: all lines in append order, one per row.
    #[must_use]
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of lines appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Couples a transcript with the sink it publishes to.
///
/// The typical call is [`ProgressReporter::append_and_publish`]: append the
/// line, re-render, push the full transcript to the surface. The sink is
/// invoked exactly once per appended line.
#[derive(Debug)]
pub struct ProgressReporter<S: ProgressSink> {
    transcript: ProgressTranscript,
    sink: S,
}

impl<S: ProgressSink> ProgressReporter<S> {
    /// Creates a reporter over a fresh transcript.
    pub fn new(sink: S) -> Self {
        Self {
            transcript: ProgressTranscript::new(),
            sink,
        }
    }

    /// Appends a line and publishes the re-rendered transcript.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the sink rejects the update. The
    /// line stays appended either way; the transcript never rolls back.
    pub async fn append_and_publish(&mut self, line: impl Into<String>) -> Result<(), TransportError> {
        self.transcript.append(line);
        self.sink.publish(&self.transcript.render()).await
    }

    /// Read access to the accumulated transcript.
    #[must_use]
    pub fn transcript(&self) -> &ProgressTranscript {
        &self.transcript
    }

    /// Consumes the reporter, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Records every published render for assertions.
    #[derive(Debug, Default)]
    struct RecordingSink {
        published: Vec<String>,
        fail: bool,
    }

    #[async_trait]
    impl ProgressSink for RecordingSink {
        async fn publish(&mut self, rendered: &str) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::publish(std::io::Error::other("gone")));
            }
            self.published.push(rendered.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_render_concatenates_lines_in_order() {
        let mut transcript = ProgressTranscript::new();
        assert!(transcript.is_empty());

        transcript.append("first");
        transcript.append("second");
        transcript.append("third");

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.render(), "first\nsecond\nthird");
    }

    #[tokio::test]
    async fn test_append_and_publish_pushes_full_transcript_each_time() {
        let mut reporter = ProgressReporter::new(RecordingSink::default());

        reporter.append_and_publish("one").await.unwrap();
        reporter.append_and_publish("two").await.unwrap();

        let sink = reporter.into_sink();
        assert_eq!(sink.published, vec!["one".to_string(), "one\ntwo".to_string()]);
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_line_appended() {
        let mut reporter = ProgressReporter::new(RecordingSink {
            published: Vec::new(),
            fail: true,
        });

        let result = reporter.append_and_publish("doomed").await;
        assert!(result.is_err());
        assert_eq!(reporter.transcript().len(), 1);
    }
}
