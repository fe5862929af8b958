//! Document model for a parsed paper.
//!
//! A paper is a [`Document`] holding ordered [`Section`]s, each owning its
//! numbered [`Paragraph`]s. Ids are derived from the paper number, section
//! index and paragraph ordinal so they stay stable across re-parses and can be
//! used as anchors and deep-link targets.

use serde::Serialize;

/// Display title of an untitled introduction.
pub const INTRODUCTION: &str = "Introduction";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Smallest addressable unit of body text.
pub struct Paragraph {
    /// Anchor id, `p-<paper>-<section>-<ordinal>`.
    pub id: String,
    /// Position within the owning section, starting at 1.
    pub ordinal: usize,
    /// Body text.
    pub text: String,
}

impl Paragraph {
    #[must_use]
    /// Builds the anchor id for a paragraph.
    pub fn anchor_id(paper_number: &str, section_index: &str, ordinal: usize) -> String {
        format!("p-{paper_number}-{section_index}-{ordinal}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Named subdivision of a paper.
pub struct Section {
    /// Anchor id, `section-<index>`.
    pub id: String,
    /// Unpadded section index; `"0"` is the introduction.
    pub index: String,
    /// Title as provided by the content, possibly empty.
    pub title: String,
    /// Paragraphs in reading order.
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    #[must_use]
    /// Creates an empty section for an index.
    pub fn new(index: &str, title: &str) -> Self {
        Self {
            id: Self::anchor_id(index),
            index: index.to_string(),
            title: title.to_string(),
            paragraphs: Vec::new(),
        }
    }

    #[must_use]
    /// Builds the anchor id for a section index.
    pub fn anchor_id(index: &str) -> String {
        format!("section-{index}")
    }

    #[must_use]
    /// Whether this is the unnumbered introduction.
    pub fn is_introduction(&self) -> bool {
        self.index == "0"
    }

    #[must_use]
    /// Title shown in headings and menus.
    ///
    /// An untitled introduction reads "Introduction"; any other untitled
    /// section falls back to its number.
    pub fn display_title(&self) -> String {
        if !self.title.is_empty() {
            self.title.clone()
        } else if self.is_introduction() {
            INTRODUCTION.to_string()
        } else {
            format!("Section {}", self.index)
        }
    }

    #[must_use]
    /// Numeric value of the index, used for ordering.
    pub fn number(&self) -> u32 {
        self.index.parse().unwrap_or(u32::MAX)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A parsed paper.
pub struct Document {
    /// Paper number, zero-padded to three digits.
    pub paper_number: String,
    /// Sections ordered by index with the introduction first.
    pub sections: Vec<Section>,
}

impl Document {
    #[must_use]
    /// Whether the paper has no content at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    /// Total number of paragraphs across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// Paragraphs in reading order with their owning section.
    pub fn paragraphs(&self) -> impl Iterator<Item = (&Section, &Paragraph)> {
        self.sections
            .iter()
            .flat_map(|s| s.paragraphs.iter().map(move |p| (s, p)))
    }

    #[must_use]
    /// Looks up a section by anchor id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    #[must_use]
    /// Looks up a section by index.
    pub fn section_by_index(&self, index: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.index == index)
    }

    #[must_use]
    /// Looks up a paragraph and its section by anchor id.
    pub fn paragraph(&self, id: &str) -> Option<(&Section, &Paragraph)> {
        self.paragraphs().find(|(_, p)| p.id == id)
    }
}
