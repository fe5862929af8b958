use super::{AppState, View, TOAST_DURATION};
use crate::catalog::PaperNumber;
use crate::clipboard::{Clipboard, Selection};
use crate::config::Config;
use crate::error::{ClipboardError, SettingsError};
use crate::record::ContentRecord;
use crate::reference::Reference;
use crate::source::StaticSource;
use crate::theme::{LineSpacing, MemoryStore, Preferences, SettingField, SettingsStore, ThemeSettings};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
struct SharedClipboard(Rc<RefCell<Option<String>>>);

impl Clipboard for SharedClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.0.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no display".to_string()))
    }
}

#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl SettingsStore for SharedStore {
    fn load(&self) -> Result<Option<ThemeSettings>, SettingsError> {
        self.0.borrow().load()
    }

    fn save(&mut self, settings: &ThemeSettings) -> Result<(), SettingsError> {
        self.0.borrow_mut().save(settings)
    }
}

fn paper(n: u16) -> PaperNumber {
    PaperNumber::new(n).unwrap()
}

/// Introduction and sections 1 to 3, three short paragraphs each.
fn records() -> Vec<ContentRecord> {
    let mut records = Vec::new();
    for section in 0..4 {
        let key = format!("001.{section}");
        let title = if section == 0 {
            String::new()
        } else {
            format!("Title {section}")
        };
        records.push(ContentRecord::section_title(&key, &title));
        for n in 1..=3 {
            records.push(ContentRecord::paragraph(&key, &format!("Para {section}.{n}")));
        }
    }
    records
}

fn source() -> StaticSource {
    StaticSource::default()
        .with_paper(paper(1), records())
        .with_paper(
            paper(3),
            vec![
                ContentRecord::section_title("003.1", "Only"),
                ContentRecord::paragraph("003.x", "Bad key"),
                ContentRecord::paragraph("003.1", "Good"),
            ],
        )
}

fn app_with(clipboard: Box<dyn Clipboard>, store: SharedStore) -> AppState {
    let cfg = Config::from_toml("").unwrap();
    let mut app = AppState::new(
        Box::new(source()),
        clipboard,
        Preferences::load(Box::new(store)),
        &cfg,
    );
    app.resize(40, 10, Instant::now());
    app
}

/// Paper 1 open in a 40x10 page.
///
/// Rows: title block 0..4, then sections 0 to 3 at 4, 12, 20 and 28, each 8
/// rows tall (heading, blank, three paragraphs with gaps, trailing blank).
fn app() -> AppState {
    let mut app = app_with(Box::new(SharedClipboard::default()), SharedStore::default());
    app.open_paper(paper(1), Instant::now()).unwrap();
    app
}

#[test]
fn test_open_paper_registers_sections() {
    let app = app();
    let ids: Vec<_> = app.tracker.observed_section_ids().collect();
    assert_eq!(ids, ["section-0", "section-1", "section-2", "section-3"]);
    assert_eq!(app.viewport.content_height, 36);
    assert_eq!(app.tracker.current_active_id(), Some("section-0"));
    assert_eq!(app.tracker.current_title(), Some("Introduction"));
    assert!(app.diagnostics_summary().is_none());
}

#[test]
fn test_jump_to_section_scrolls_below_header() {
    let mut app = app();
    app.jump_to_section("section-2", Instant::now()).unwrap();
    assert_eq!(app.viewport.scroll, 18);
    assert_eq!(app.tracker.current_active_id(), Some("section-2"));
}

#[test]
fn test_jump_to_unknown_section() {
    let mut app = app();
    assert!(app.jump_to_section("section-9", Instant::now()).is_err());
    assert_eq!(app.viewport.scroll, 0);
}

#[test]
fn test_scrolling_updates_active_section() {
    let mut app = app();
    let now = Instant::now();
    app.scroll_by(10, now);
    assert_eq!(app.tracker.current_active_id(), Some("section-1"));

    app.scroll_to_bottom(now);
    assert_eq!(app.viewport.scroll, 26);
    assert_eq!(app.tracker.current_active_id(), Some("section-3"));

    app.scroll_to_top(now);
    assert_eq!(app.tracker.current_active_id(), Some("section-0"));

    app.scroll_by(-5, now);
    assert_eq!(app.viewport.scroll, 0);
}

#[test]
fn test_next_and_prev_section() {
    let mut app = app();
    let now = Instant::now();

    app.next_section(now);
    assert_eq!(app.viewport.scroll, 10);
    assert_eq!(app.tracker.current_active_id(), Some("section-1"));

    // at the start of section 1, so back to the introduction
    let later = now + Duration::from_secs(1);
    app.prev_section(later);
    assert_eq!(app.viewport.scroll, 2);
    assert_eq!(app.tracker.current_active_id(), Some("section-0"));
}

#[test]
fn test_prev_section_returns_to_start_of_current() {
    let mut app = app();
    let now = Instant::now() + Duration::from_secs(1);
    app.scroll_by(13, now);
    assert_eq!(app.tracker.current_active_id(), Some("section-1"));

    app.prev_section(now);
    assert_eq!(app.viewport.scroll, 10);
}

#[test]
fn test_open_reference_to_paragraph() {
    let mut app = app_with(Box::new(SharedClipboard::default()), SharedStore::default());
    let now = Instant::now();
    let reference: Reference = "1:2.2".parse().unwrap();

    app.open_reference(reference, now).unwrap();

    assert_eq!(app.paper, Some(paper(1)));
    assert_eq!(app.viewport.scroll, 22);
    assert_eq!(app.tracker.current_active_id(), Some("section-2"));
    assert_eq!(
        app.highlight.as_ref().map(|(id, _)| id.as_str()),
        Some("p-001-2-2")
    );

    app.tick(now + Duration::from_secs(3));
    assert!(app.highlight.is_none());
}

#[test]
fn test_open_reference_to_missing_section() {
    let mut app = app();
    let reference: Reference = "1:9".parse().unwrap();
    assert!(app.open_reference(reference, Instant::now()).is_err());
    assert_eq!(app.paper, Some(paper(1)));
}

#[test]
fn test_missing_paper_shows_error() {
    let mut app = app();
    assert!(app.open_paper(paper(2), Instant::now()).is_err());
    assert!(app.document.is_none());
    assert!(app.load_error.as_deref().unwrap().contains("002"));
    assert_eq!(app.tracker.current_active_id(), None);

    assert!(app.next_paper(Instant::now()).is_ok());
    assert_eq!(app.paper, Some(paper(3)));
}

#[test]
fn test_diagnostics_surface() {
    let mut app = app();
    app.open_paper(paper(3), Instant::now()).unwrap();
    assert_eq!(app.diagnostics.len(), 1);
    assert_eq!(
        app.diagnostics_summary().as_deref(),
        Some("1 content problem (see log)")
    );
}

#[test]
fn test_copy_focused_paragraph() {
    let clipboard = SharedClipboard::default();
    let mut app = app_with(Box::new(clipboard.clone()), SharedStore::default());
    let now = Instant::now();
    app.open_paper(paper(1), now).unwrap();

    app.copy_selection(now);

    assert_eq!(
        clipboard.0.borrow().as_deref(),
        Some("Para 0.1\n\n(1:0.1)")
    );
    assert_eq!(
        app.message.as_ref().map(|m| m.text.as_str()),
        Some("Copied 1:0.1 to clipboard")
    );
}

#[test]
fn test_copy_selection_range() {
    let clipboard = SharedClipboard::default();
    let mut app = app_with(Box::new(clipboard.clone()), SharedStore::default());
    let now = Instant::now();
    app.open_paper(paper(1), now).unwrap();

    let mut selection = Selection::new(1);
    selection.extend_to(0);
    app.selection = Some(selection);
    app.copy_selection(now);

    assert_eq!(
        clipboard.0.borrow().as_deref(),
        Some("Para 0.1\n\nPara 0.2\n\n(1:0.1-2)")
    );
    assert!(app.selection.is_none());
}

#[test]
fn test_selection_follows_scroll() {
    let mut app = app();
    let now = Instant::now();
    app.toggle_selection();
    assert_eq!(app.selection.map(|s| s.range()), Some(0..=0));

    app.scroll_by(10, now);
    assert_eq!(app.selection.map(|s| s.range()), Some(0..=3));

    app.toggle_selection();
    assert!(app.selection.is_none());
}

#[test]
fn test_copy_failure_is_reported() {
    let mut app = app_with(Box::new(BrokenClipboard), SharedStore::default());
    let now = Instant::now();
    app.open_paper(paper(1), now).unwrap();

    app.copy_selection(now);
    assert_eq!(
        app.message.as_ref().map(|m| m.text.as_str()),
        Some("clipboard unavailable: no display")
    );

    app.tick(now + TOAST_DURATION);
    assert!(app.message.is_none());
}

#[test]
fn test_settings_change_persists_and_relayouts() {
    let store = SharedStore::default();
    let mut app = app_with(Box::new(SharedClipboard::default()), store.clone());
    let now = Instant::now();
    app.open_paper(paper(1), now).unwrap();
    app.jump_to_section("section-1", now).unwrap();

    app.current_view = View::Settings;
    app.settings_move(3);
    assert_eq!(SettingField::ALL[app.settings_cursor], SettingField::LineSpacing);
    app.settings_cycle(true, now);

    assert_eq!(app.preferences.settings().line_spacing, LineSpacing::Relaxed);
    assert_eq!(store.0.borrow().writes, 1);
    // two extra blank rows per section
    assert_eq!(app.viewport.content_height, 44);
    // the first paragraph of section 1 stays at the top of the window
    let top = app.layout.paragraph("p-001-1-1").unwrap().top;
    assert_eq!(app.viewport.scroll + app.header_offset, top);
}

#[test]
fn test_command_opens_reference() {
    let mut app = app();
    let now = Instant::now();

    app.current_view = View::Command;
    app.command_buffer = "1:3".to_string();
    app.run_command(now);

    assert_eq!(app.current_view, View::Reading);
    assert!(app.command_buffer.is_empty());
    assert_eq!(app.tracker.current_active_id(), Some("section-3"));

    app.command_buffer = "nonsense".to_string();
    app.run_command(now);
    assert!(app
        .message
        .as_ref()
        .is_some_and(|m| m.text.starts_with("invalid reference")));
}

#[test]
fn test_contents_navigation() {
    let mut app = app();
    let now = Instant::now();

    app.open_contents();
    assert_eq!(app.current_view, View::Contents);
    assert_eq!(app.contents.part, 0);
    assert_eq!(app.contents_selection(), Some(paper(1)));

    app.contents_move(2);
    assert_eq!(app.contents_selection(), Some(paper(3)));
    app.contents_select(now);

    assert_eq!(app.current_view, View::Reading);
    assert_eq!(app.paper, Some(paper(3)));

    app.open_contents();
    app.contents_switch_part(false);
    assert_eq!(app.contents.part, 3);
    assert_eq!(app.contents_selection(), Some(paper(120)));
}

#[test]
fn test_jump_menu() {
    let mut app = app();
    let now = Instant::now();
    app.jump_to_section("section-1", now).unwrap();

    app.open_jump_menu();
    assert_eq!(app.jump_cursor, 1);

    app.jump_menu_move(10);
    assert_eq!(app.jump_cursor, 3);
    app.jump_menu_select(now);

    assert_eq!(app.current_view, View::Reading);
    assert_eq!(app.tracker.current_active_id(), Some("section-3"));
}

#[test]
fn test_resize_keeps_position() {
    let mut app = app();
    let now = Instant::now();
    app.jump_to_section("section-2", now).unwrap();

    app.resize(30, 10, now);

    let top = app.layout.paragraph("p-001-2-1").unwrap().top;
    assert!(app.viewport.scroll + app.header_offset <= top);
    assert_eq!(app.tracker.current_active_id(), Some("section-2"));
}
