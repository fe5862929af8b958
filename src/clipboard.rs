//! Copying selected paragraphs to the system clipboard.

use crate::catalog::PaperNumber;
use crate::error::ClipboardError;
use crate::reference::Reference;
use crate::section::Document;
use std::ops::RangeInclusive;

/// Accepts copied text.
pub trait Clipboard {
    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be opened or written.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Default)]
/// The desktop clipboard, opened on first use.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable("not initialised".to_string()));
        };
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Rejected(e.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A run of paragraphs, by position in reading order.
pub struct Selection {
    anchor: usize,
    head: usize,
}

impl Selection {
    #[must_use]
    /// Selects a single paragraph.
    pub fn new(at: usize) -> Self {
        Self {
            anchor: at,
            head: at,
        }
    }

    /// Moves the free end of the selection.
    pub fn extend_to(&mut self, head: usize) {
        self.head = head;
    }

    #[must_use]
    /// Selected positions, lowest first.
    pub fn range(&self) -> RangeInclusive<usize> {
        self.anchor.min(self.head)..=self.anchor.max(self.head)
    }

    #[must_use]
    /// Whether `position` is selected.
    pub fn contains(&self, position: usize) -> bool {
        self.range().contains(&position)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Text ready to be copied.
pub struct Excerpt {
    /// Paragraph text followed by the citation.
    pub text: String,
    /// Citation such as `1:2.3` or `1:2.3-5`.
    pub citation: String,
}

/// Builds the text for a selection of paragraphs.
///
/// Paragraphs are separated by blank lines and followed by their citation.
/// Returns `None` when nothing but whitespace is selected.
#[must_use]
pub fn excerpt(
    document: &Document,
    paper: PaperNumber,
    range: RangeInclusive<usize>,
) -> Option<Excerpt> {
    let (start, end) = range.into_inner();
    let selected: Vec<_> = document
        .paragraphs()
        .skip(start)
        .take(end.saturating_sub(start) + 1)
        .collect();

    let body = selected
        .iter()
        .map(|(_, p)| p.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n");
    if body.trim().is_empty() {
        return None;
    }

    let (first_section, first) = selected.first()?;
    let (last_section, last) = selected.last()?;
    let start = Reference::for_paragraph(paper, first_section, first.ordinal);
    let citation = if selected.len() == 1 {
        start.to_string()
    } else if first_section.id == last_section.id {
        format!("{start}-{}", last.ordinal)
    } else {
        let end = Reference::for_paragraph(paper, last_section, last.ordinal);
        format!("{start}-{end}")
    };

    Some(Excerpt {
        text: format!("{body}\n\n({citation})"),
        citation,
    })
}

#[cfg(test)]
#[path = "tests/clipboard.rs"]
mod tests;
