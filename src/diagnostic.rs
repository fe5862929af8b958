//! Recoverable problems found while ingesting and structuring content.
//!
//! Records that cannot be placed in the document are never dropped without a
//! signal: the parser and the JSON decoder report them to a caller-supplied
//! [`DiagnosticSink`] and carry on.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// A recoverable condition reported while building a document.
pub enum Diagnostic {
    /// The record was excluded from the document.
    #[error("record {position} skipped: {reason}")]
    MalformedRecord {
        /// Zero-based position of the record in the input.
        position: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Paragraphs referenced a section that has no title record.
    #[error("{paragraphs} paragraph(s) in untitled section {section_index} kept as a trailing section")]
    OrphanParagraphGroup {
        /// Section index shared by the group.
        section_index: String,
        /// Number of paragraphs in the group.
        paragraphs: usize,
    },

    /// A second title record was seen for an index; merged into the first.
    #[error("record {position} repeats the title of section {section_index}")]
    DuplicateSection {
        /// Zero-based position of the repeated record.
        position: usize,
        /// Section index that was repeated.
        section_index: String,
    },
}

/// Receives diagnostics as they are found.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[derive(Debug, Default, Clone, Copy)]
/// Forwards diagnostics to `tracing` at warn level.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "content diagnostic");
    }
}
