//! The core state machine bridging parsed papers and the terminal reader.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user reads
//! and navigates. `AppState` owns the loaded document, its layout, the viewport and the
//! active-section tracker, and is the only place any of them change. Every scroll goes through
//! [`AppState::refresh_visibility`] so the tracker sees the same viewport the user does.

use crate::catalog::{PaperNumber, PARTS};
use crate::clipboard::{excerpt, Clipboard, Selection};
use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::error::{FetchError, ReaderError, TrackerError};
use crate::layout::{signed, PageLayout};
use crate::parser::parse_document;
use crate::reference::{Reference, Target};
use crate::section::Document;
use crate::source::RecordSource;
use crate::theme::{Preferences, SettingField};
use crate::tracker::{ActiveSectionTracker, Scroller};
use std::time::{Duration, Instant};

/// How long status messages stay visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

/// How long a deep-linked paragraph stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// The paper text.
    Reading,
    /// Parts and papers of the book.
    Contents,
    /// Sections of the current paper.
    JumpMenu,
    /// Display preferences.
    Settings,
    /// Captures a reference typed after ':'.
    Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// The visible slice of the page.
pub struct Viewport {
    /// First visible row.
    pub scroll: usize,
    /// Columns available to the page.
    pub width: u16,
    /// Rows available to the page, sticky header included.
    pub height: usize,
    /// Total rows of the laid-out page.
    pub content_height: usize,
}

impl Viewport {
    #[must_use]
    /// Largest scroll position that still fills the viewport.
    pub fn max_scroll(&self) -> usize {
        self.content_height.saturating_sub(self.height)
    }
}

impl Scroller for Viewport {
    fn scroll_to(&mut self, offset: i64, _animated: bool) {
        let max = signed(self.max_scroll());
        self.scroll = usize::try_from(offset.clamp(0, max)).unwrap_or(0);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Cursor of the contents view; one part is expanded at a time.
pub struct ContentsCursor {
    /// Position of the expanded part in [`PARTS`].
    pub part: usize,
    /// Position of the highlighted paper within the part.
    pub paper: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A timed status message.
pub struct Toast {
    /// Message text.
    pub text: String,
    /// When it disappears.
    pub until: Instant,
}

/// Bridges the parsed paper and the interactive reader, maintaining session state.
pub struct AppState {
    source: Box<dyn RecordSource>,
    clipboard: Box<dyn Clipboard>,
    /// Display preferences, written back on change.
    pub preferences: Preferences,
    /// Rows covered by the sticky header.
    pub header_offset: usize,
    /// Rows moved per line scroll.
    pub scroll_step: usize,
    /// Paper currently open.
    pub paper: Option<PaperNumber>,
    /// Parsed paper, if one loaded.
    pub document: Option<Document>,
    /// Layout of the open paper.
    pub layout: PageLayout,
    /// Visible slice of the layout.
    pub viewport: Viewport,
    /// Owner of the active section.
    pub tracker: ActiveSectionTracker,
    /// Problems found while loading the open paper.
    pub diagnostics: Vec<Diagnostic>,
    /// Why the last paper failed to load.
    pub load_error: Option<String>,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Contents view cursor.
    pub contents: ContentsCursor,
    /// Jump menu cursor (section position).
    pub jump_cursor: usize,
    /// Settings view cursor (field position).
    pub settings_cursor: usize,
    /// Paragraphs marked for copying.
    pub selection: Option<Selection>,
    /// Deep-linked paragraph and when its highlight ends.
    pub highlight: Option<(String, Instant)>,
    /// Accumulates reference input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the status bar.
    pub message: Option<Toast>,
}

impl AppState {
    #[must_use]
    /// Initialises the reader with its collaborators and nothing open.
    pub fn new(
        source: Box<dyn RecordSource>,
        clipboard: Box<dyn Clipboard>,
        preferences: Preferences,
        cfg: &Config,
    ) -> Self {
        let header_offset = usize::try_from(cfg.header_offset).unwrap_or(0);
        Self {
            source,
            clipboard,
            preferences,
            header_offset,
            scroll_step: cfg.scroll_step.max(1),
            paper: None,
            document: None,
            layout: PageLayout::default(),
            viewport: Viewport::default(),
            tracker: ActiveSectionTracker::new(signed(header_offset), cfg.settle_window()),
            diagnostics: Vec::new(),
            load_error: None,
            current_view: View::Reading,
            contents: ContentsCursor::default(),
            jump_cursor: 0,
            settings_cursor: 0,
            selection: None,
            highlight: None,
            command_buffer: String::new(),
            message: None,
        }
    }

    /// Adapts the layout to a new terminal size.
    pub fn resize(&mut self, width: u16, height: usize, now: Instant) {
        if width == self.viewport.width && height == self.viewport.height {
            return;
        }
        let width_changed = width != self.viewport.width;
        self.viewport.width = width;
        self.viewport.height = height;
        if width_changed {
            self.relayout_keeping_position(now);
        } else {
            self.clamp_scroll();
            self.refresh_visibility(now);
        }
    }

    /// Loads, parses and lays out a paper, replacing the open one.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the paper's records could not be obtained;
    /// the reader then shows the error instead of content.
    pub fn open_paper(&mut self, paper: PaperNumber, now: Instant) -> Result<(), FetchError> {
        let mut diagnostics = Vec::new();
        let records = match self.source.fetch_records(paper, &mut diagnostics) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(paper = %paper, error = %e, "failed to load paper");
                self.paper = Some(paper);
                self.document = None;
                self.diagnostics = diagnostics;
                self.load_error = Some(e.to_string());
                self.selection = None;
                self.highlight = None;
                self.tracker.clear();
                self.layout = PageLayout::default();
                self.viewport.content_height = 0;
                self.viewport.scroll = 0;
                return Err(e);
            }
        };

        let document = parse_document(&paper.padded(), &records, &mut diagnostics);
        for diagnostic in &diagnostics {
            tracing::warn!(paper = %paper, %diagnostic, "content diagnostic");
        }
        tracing::info!(
            paper = %paper,
            sections = document.sections.len(),
            paragraphs = document.paragraph_count(),
            "opened paper"
        );

        self.paper = Some(paper);
        self.document = Some(document);
        self.diagnostics = diagnostics;
        self.load_error = None;
        self.selection = None;
        self.highlight = None;
        self.viewport.scroll = 0;
        self.relayout(now);
        Ok(())
    }

    /// Opens the paper after the current one.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the paper could not be loaded.
    pub fn next_paper(&mut self, now: Instant) -> Result<(), FetchError> {
        match self.paper.and_then(PaperNumber::following) {
            Some(paper) => self.open_paper(paper, now),
            None => Ok(()),
        }
    }

    /// Opens the paper before the current one.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the paper could not be loaded.
    pub fn prev_paper(&mut self, now: Instant) -> Result<(), FetchError> {
        match self.paper.and_then(PaperNumber::preceding) {
            Some(paper) => self.open_paper(paper, now),
            None => Ok(()),
        }
    }

    /// Opens a deep link: loads the paper if needed, then scrolls to the target.
    ///
    /// A paragraph target is highlighted for [`HIGHLIGHT_DURATION`].
    ///
    /// # Errors
    ///
    /// Returns an error if the paper cannot be loaded or has no such section
    /// or paragraph.
    pub fn open_reference(&mut self, reference: Reference, now: Instant) -> Result<(), ReaderError> {
        if self.paper != Some(reference.paper) || self.document.is_none() {
            self.open_paper(reference.paper, now)?;
        }
        let Some(document) = &self.document else {
            return Ok(());
        };

        match reference.resolve(document)? {
            Target::Paper => {
                self.viewport.scroll = 0;
                self.refresh_visibility(now);
            }
            Target::Section(id) => {
                self.jump_to_section(&id, now).ok();
            }
            Target::Paragraph { section, paragraph } => {
                self.jump_to_section(&section, now).ok();
                if let Some(span) = self.layout.paragraph(&paragraph) {
                    let offset = signed(span.top) - signed(self.header_offset);
                    self.viewport.scroll_to(offset, true);
                    self.refresh_visibility(now);
                }
                self.highlight = Some((paragraph, now + HIGHLIGHT_DURATION));
            }
        }
        Ok(())
    }

    /// Scrolls to a section and makes it the active one.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::SectionNotFound`] if the section is not on the page.
    pub fn jump_to_section(&mut self, id: &str, now: Instant) -> Result<(), TrackerError> {
        self.tracker.jump_to(id, &mut self.viewport, now)?;
        self.after_scroll(now);
        Ok(())
    }

    /// Jumps to the section after the active one.
    pub fn next_section(&mut self, now: Instant) {
        let next = match self.active_section_position() {
            Some(pos) => pos + 1,
            None => 0,
        };
        if let Some(id) = self.layout.sections.get(next).map(|s| s.id.clone()) {
            self.jump_to_section(&id, now).ok();
        }
    }

    /// Jumps to the section before the active one, or to its start if
    /// already inside it.
    pub fn prev_section(&mut self, now: Instant) {
        let Some(pos) = self.active_section_position() else {
            return;
        };
        let section_top = self.layout.sections[pos].top;
        let at_top = self.viewport.scroll + self.header_offset <= section_top;
        let target = if at_top { pos.checked_sub(1) } else { Some(pos) };
        if let Some(id) = target.and_then(|p| self.layout.sections.get(p)).map(|s| s.id.clone()) {
            self.jump_to_section(&id, now).ok();
        }
    }

    /// Scrolls by `rows` (negative is up).
    pub fn scroll_by(&mut self, rows: i64, now: Instant) {
        let offset = signed(self.viewport.scroll) + rows;
        self.viewport.scroll_to(offset, false);
        self.after_scroll(now);
    }

    /// Scrolls one step down.
    pub fn line_down(&mut self, now: Instant) {
        self.scroll_by(signed(self.scroll_step), now);
    }

    /// Scrolls one step up.
    pub fn line_up(&mut self, now: Instant) {
        self.scroll_by(-signed(self.scroll_step), now);
    }

    /// Scrolls one screen down, keeping the sticky header's rows in view.
    pub fn page_down(&mut self, now: Instant) {
        self.scroll_by(signed(self.page_rows()), now);
    }

    /// Scrolls one screen up.
    pub fn page_up(&mut self, now: Instant) {
        self.scroll_by(-signed(self.page_rows()), now);
    }

    /// Scrolls to the start of the paper.
    pub fn scroll_to_top(&mut self, now: Instant) {
        self.viewport.scroll_to(0, false);
        self.after_scroll(now);
    }

    /// Scrolls to the end of the paper.
    pub fn scroll_to_bottom(&mut self, now: Instant) {
        self.viewport.scroll_to(signed(self.viewport.max_scroll()), false);
        self.after_scroll(now);
    }

    /// Feeds the tracker the visibility of every section at the current scroll.
    pub fn refresh_visibility(&mut self, now: Instant) {
        let events =
            self.layout
                .visibility(self.viewport.scroll, self.viewport.height, self.header_offset);
        self.tracker.on_visibility_change(&events, now);
    }

    #[must_use]
    /// Position of the first paragraph visible below the sticky header.
    pub fn focused_paragraph(&self) -> Option<usize> {
        self.layout
            .paragraph_at(self.viewport.scroll + self.header_offset)
    }

    /// Starts a selection at the focused paragraph, or cancels the current one.
    pub fn toggle_selection(&mut self) {
        self.selection = match self.selection {
            Some(_) => None,
            None => self.focused_paragraph().map(Selection::new),
        };
    }

    /// Copies the selection, or the focused paragraph, to the clipboard.
    pub fn copy_selection(&mut self, now: Instant) {
        let range = match (self.selection, self.focused_paragraph()) {
            (Some(selection), _) => selection.range(),
            (None, Some(focused)) => focused..=focused,
            (None, None) => {
                self.notify("Nothing to copy", now);
                return;
            }
        };
        let (Some(document), Some(paper)) = (&self.document, self.paper) else {
            self.notify("Nothing to copy", now);
            return;
        };
        let Some(excerpt) = excerpt(document, paper, range) else {
            self.notify("Nothing to copy", now);
            return;
        };

        match self.clipboard.set_text(&excerpt.text) {
            Ok(()) => {
                tracing::debug!(citation = excerpt.citation.as_str(), "copied excerpt");
                self.notify(&format!("Copied {} to clipboard", excerpt.citation), now);
                self.selection = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard write failed");
                self.notify(&e.to_string(), now);
            }
        }
    }

    // --- Contents ---

    /// Shows the contents with the open paper's part expanded.
    pub fn open_contents(&mut self) {
        let paper = self.paper.unwrap_or(PaperNumber::FOREWORD);
        let part = PARTS.iter().position(|p| p.contains(paper)).unwrap_or(0);
        let offset = PARTS[part].papers().position(|p| p == paper).unwrap_or(0);
        self.contents = ContentsCursor {
            part,
            paper: offset,
        };
        self.current_view = View::Contents;
    }

    /// Moves the contents cursor within the expanded part.
    pub fn contents_move(&mut self, delta: isize) {
        let len = PARTS[self.contents.part].papers().count();
        self.contents.paper = self
            .contents
            .paper
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
    }

    /// Expands the next or previous part.
    pub fn contents_switch_part(&mut self, forward: bool) {
        let len = PARTS.len();
        self.contents.part = if forward {
            (self.contents.part + 1) % len
        } else {
            (self.contents.part + len - 1) % len
        };
        self.contents.paper = 0;
    }

    #[must_use]
    /// Paper under the contents cursor.
    pub fn contents_selection(&self) -> Option<PaperNumber> {
        PARTS[self.contents.part].papers().nth(self.contents.paper)
    }

    /// Opens the paper under the contents cursor and returns to reading.
    pub fn contents_select(&mut self, now: Instant) {
        if let Some(paper) = self.contents_selection() {
            if let Err(e) = self.open_paper(paper, now) {
                self.notify(&e.to_string(), now);
            }
        }
        self.current_view = View::Reading;
    }

    // --- Jump menu ---

    /// Shows the section menu with the active section highlighted.
    pub fn open_jump_menu(&mut self) {
        self.jump_cursor = self.active_section_position().unwrap_or(0);
        self.current_view = View::JumpMenu;
    }

    /// Moves the jump menu cursor.
    pub fn jump_menu_move(&mut self, delta: isize) {
        let len = self.layout.sections.len();
        self.jump_cursor = self
            .jump_cursor
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
    }

    /// Jumps to the section under the cursor and returns to reading.
    pub fn jump_menu_select(&mut self, now: Instant) {
        if let Some(id) = self.layout.sections.get(self.jump_cursor).map(|s| s.id.clone()) {
            if let Err(e) = self.jump_to_section(&id, now) {
                self.notify(&e.to_string(), now);
            }
        }
        self.current_view = View::Reading;
    }

    // --- Settings ---

    /// Moves the settings cursor.
    pub fn settings_move(&mut self, delta: isize) {
        self.settings_cursor = self
            .settings_cursor
            .saturating_add_signed(delta)
            .min(SettingField::ALL.len() - 1);
    }

    /// Changes the highlighted setting, persists it and re-lays the page out.
    pub fn settings_cycle(&mut self, forward: bool, now: Instant) {
        let field = SettingField::ALL[self.settings_cursor];
        let before = *self.preferences.settings();
        if let Err(e) = self.preferences.update(|s| field.cycle(s, forward)) {
            tracing::warn!(error = %e, "failed to save display settings");
            self.notify(&e.to_string(), now);
        }
        if *self.preferences.settings() != before {
            self.relayout_keeping_position(now);
        }
    }

    // --- Command ---

    /// Interprets the command buffer as a reference and opens it.
    pub fn run_command(&mut self, now: Instant) {
        let input = std::mem::take(&mut self.command_buffer);
        self.current_view = View::Reading;
        if input.trim().is_empty() {
            return;
        }
        let result = input
            .parse::<Reference>()
            .map_err(ReaderError::from)
            .and_then(|reference| self.open_reference(reference, now));
        if let Err(e) = result {
            self.notify(&e.to_string(), now);
        }
    }

    // --- Status ---

    /// Shows a message in the status bar for [`TOAST_DURATION`].
    pub fn notify(&mut self, text: &str, now: Instant) {
        self.message = Some(Toast {
            text: text.to_string(),
            until: now + TOAST_DURATION,
        });
    }

    /// Expires timed state.
    pub fn tick(&mut self, now: Instant) {
        if self.message.as_ref().is_some_and(|m| m.until <= now) {
            self.message = None;
        }
        if self.highlight.as_ref().is_some_and(|(_, until)| *until <= now) {
            self.highlight = None;
        }
    }

    #[must_use]
    /// Summary of load problems for the status bar.
    pub fn diagnostics_summary(&self) -> Option<String> {
        match self.diagnostics.len() {
            0 => None,
            1 => Some("1 content problem (see log)".to_string()),
            n => Some(format!("{n} content problems (see log)")),
        }
    }

    #[must_use]
    /// Position of the active section in the layout.
    pub fn active_section_position(&self) -> Option<usize> {
        let active = self.tracker.current_active_id()?;
        self.layout.sections.iter().position(|s| s.id == active)
    }

    fn page_rows(&self) -> usize {
        self.viewport
            .height
            .saturating_sub(self.header_offset)
            .saturating_sub(1)
            .max(1)
    }

    fn after_scroll(&mut self, now: Instant) {
        self.refresh_visibility(now);
        let focused = self.focused_paragraph();
        if let (Some(selection), Some(focused)) = (self.selection.as_mut(), focused) {
            selection.extend_to(focused);
        }
    }

    fn clamp_scroll(&mut self) {
        self.viewport.scroll = self.viewport.scroll.min(self.viewport.max_scroll());
    }

    /// Rebuilds the layout and re-registers every section with the tracker.
    fn relayout(&mut self, now: Instant) {
        let title = self
            .paper
            .map_or_else(|| "folio".to_string(), PaperNumber::label);

        self.layout = match &self.document {
            Some(document) => PageLayout::build(
                document,
                &title,
                self.preferences.settings(),
                self.viewport.width,
                self.header_offset,
            ),
            None => PageLayout::default(),
        };
        self.viewport.content_height = self.layout.height();
        self.clamp_scroll();

        self.tracker.clear();
        for span in &self.layout.sections {
            self.tracker.register_section(
                &span.id,
                &span.title,
                crate::tracker::Anchor {
                    top: signed(span.top),
                },
            );
        }
        self.refresh_visibility(now);
    }

    /// Re-lays out the page, keeping the focused paragraph at the top.
    fn relayout_keeping_position(&mut self, now: Instant) {
        let focused = self
            .focused_paragraph()
            .and_then(|i| self.layout.paragraphs.get(i))
            .map(|p| p.id.clone());

        self.relayout(now);

        if let Some(span) = focused.as_deref().and_then(|id| self.layout.paragraph(id)) {
            let offset = signed(span.top) - signed(self.header_offset);
            self.viewport.scroll_to(offset, false);
            self.refresh_visibility(now);
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
