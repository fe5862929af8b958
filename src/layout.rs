//! Lays a document out as terminal rows.
//!
//! The layout is the reader's equivalent of the rendered page: it knows which
//! rows each section and paragraph occupy, which is what the tracker's anchors
//! and visibility events are computed from.

use crate::section::{Document, Section};
use crate::theme::ThemeSettings;
use crate::tracker::{Anchor, VisibilityEvent};
use textwrap::Options;

/// Narrowest text column the layout will produce.
const MIN_TEXT_WIDTH: u16 = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a row shows.
pub enum LineKind {
    /// Part of the paper title.
    PaperTitle,
    /// Part of a section heading; holds the section position.
    SectionHeading(usize),
    /// Part of a paragraph; holds the flattened paragraph position.
    Text(usize),
    /// Message shown instead of content.
    Notice,
    /// Spacing.
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One terminal row of the page.
pub struct PageLine {
    /// Row role.
    pub kind: LineKind,
    /// Row text, already wrapped.
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Rows occupied by a section, heading included.
pub struct SectionSpan {
    /// Section anchor id.
    pub id: String,
    /// Title shown in headers and menus.
    pub title: String,
    /// First row.
    pub top: usize,
    /// Row after the last row.
    pub bottom: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Rows occupied by a paragraph.
pub struct ParagraphSpan {
    /// Paragraph anchor id.
    pub id: String,
    /// Position of the owning section.
    pub section: usize,
    /// Ordinal within the section.
    pub ordinal: usize,
    /// First row.
    pub top: usize,
    /// Row after the last row.
    pub bottom: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A document laid out for one width and theme.
pub struct PageLayout {
    /// Rows in order.
    pub lines: Vec<PageLine>,
    /// Section spans in document order; contiguous.
    pub sections: Vec<SectionSpan>,
    /// Paragraph spans in reading order.
    pub paragraphs: Vec<ParagraphSpan>,
    /// Width the text was wrapped to.
    pub text_width: u16,
}

impl PageLayout {
    #[must_use]
    /// Lays out `document` under `title` for a viewport `width` columns wide.
    ///
    /// `top_margin` blank rows are reserved above the title for the sticky
    /// header that overlays the top of the viewport.
    pub fn build(
        document: &Document,
        title: &str,
        settings: &ThemeSettings,
        width: u16,
        top_margin: usize,
    ) -> Self {
        let text_width = text_width(settings, width);
        let mut page = Self {
            text_width,
            ..Self::default()
        };

        page.blank(top_margin);
        for line in wrap(title, text_width, "") {
            page.push(LineKind::PaperTitle, line);
        }
        page.blank(1);

        if document.is_empty() {
            page.push(LineKind::Notice, "No content for this paper.".to_string());
            return page;
        }

        let gap = settings.paragraph_gap();
        let indent = settings.first_line_indent();

        for (position, section) in document.sections.iter().enumerate() {
            let top = page.lines.len();
            for line in wrap(&heading(section), text_width, "") {
                page.push(LineKind::SectionHeading(position), line);
            }
            page.blank(1);

            for (i, paragraph) in section.paragraphs.iter().enumerate() {
                if i > 0 {
                    page.blank(gap);
                }
                let flat = page.paragraphs.len();
                let paragraph_top = page.lines.len();
                for line in wrap(&paragraph.text, text_width, indent) {
                    page.push(LineKind::Text(flat), line);
                }
                page.paragraphs.push(ParagraphSpan {
                    id: paragraph.id.clone(),
                    section: position,
                    ordinal: paragraph.ordinal,
                    top: paragraph_top,
                    bottom: page.lines.len(),
                });
            }
            page.blank(1);

            page.sections.push(SectionSpan {
                id: section.id.clone(),
                title: section.display_title(),
                top,
                bottom: page.lines.len(),
            });
        }

        page
    }

    #[must_use]
    /// Total number of rows.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    /// Anchor of a section for tracker registration.
    pub fn section_anchor(&self, id: &str) -> Option<Anchor> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| Anchor { top: signed(s.top) })
    }

    #[must_use]
    /// Span of a paragraph by anchor id.
    pub fn paragraph(&self, id: &str) -> Option<&ParagraphSpan> {
        self.paragraphs.iter().find(|p| p.id == id)
    }

    #[must_use]
    /// First paragraph still visible at or below `row`.
    pub fn paragraph_at(&self, row: usize) -> Option<usize> {
        self.paragraphs.iter().position(|p| p.bottom > row)
    }

    #[must_use]
    /// Visibility of every section for a scroll position.
    ///
    /// The window starts `header_offset` rows below the viewport top and ends
    /// at the viewport bottom.
    pub fn visibility(
        &self,
        scroll: usize,
        viewport_height: usize,
        header_offset: usize,
    ) -> Vec<VisibilityEvent> {
        let window_top = scroll + header_offset;
        let window_bottom = scroll + viewport_height;

        self.sections
            .iter()
            .map(|s| VisibilityEvent {
                id: s.id.clone(),
                is_intersecting: s.top < window_bottom && s.bottom > window_top,
                top_distance: signed(s.top) - signed(window_top),
            })
            .collect()
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.lines.push(PageLine { kind, text });
    }

    fn blank(&mut self, rows: usize) {
        for _ in 0..rows {
            self.push(LineKind::Blank, String::new());
        }
    }
}

/// Width of the text column for a viewport.
#[must_use]
pub fn text_width(settings: &ThemeSettings, width: u16) -> u16 {
    width
        .saturating_sub(settings.padding() * 2)
        .min(settings.measure())
        .max(MIN_TEXT_WIDTH)
}

fn heading(section: &Section) -> String {
    let title = section.display_title().to_uppercase();
    if section.is_introduction() {
        title
    } else {
        format!("{}. {title}", section.index)
    }
}

fn wrap(text: &str, width: u16, indent: &str) -> Vec<String> {
    let options = Options::new(usize::from(width)).initial_indent(indent);
    textwrap::wrap(text, options)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

pub(crate) fn signed(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "tests/layout.rs"]
mod tests;
