//! The UI renders the application state into something visible and readable.
//!
//! The draw function always renders the page with its sticky header and status bar,
//! then overlays the contents, section menu or settings depending on the current view.

use crate::app_state::{AppState, View};
use crate::catalog::PARTS;
use crate::config::Config;
use crate::layout::LineKind;
use crate::theme::{Palette, SettingField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Rows reserved for the status bar.
pub const STATUS_HEIGHT: u16 = 1;

const HELP: &str = "j/k scroll  n/p section  [/] paper  c contents  s sections  t settings  v select  y copy  : go to  q quit";

#[must_use]
/// Area available to the page for a terminal area.
pub fn page_area(area: Rect) -> Rect {
    let [page, _] = split(area);
    page
}

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &mut AppState, _cfg: &Config) {
    let palette = app.preferences.settings().color_scheme.palette();
    let [page, status] = split(f.area());

    draw_page(f, app, page, palette);
    draw_sticky_header(f, app, page, palette);
    draw_status(f, app, status, palette);

    match app.current_view {
        View::Reading | View::Command => {}
        View::Contents => draw_contents(f, app, page, palette),
        View::JumpMenu => draw_jump_menu(f, app, page, palette),
        View::Settings => draw_settings(f, app, page, palette),
    }
}

fn split(area: Rect) -> [Rect; 2] {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
        .areas(area)
}

fn draw_page(f: &mut Frame, app: &AppState, area: Rect, palette: Palette) {
    let background = Style::default().bg(palette.background).fg(palette.text);
    f.render_widget(Block::default().style(background), area);

    if app.document.is_none() {
        let text = app
            .load_error
            .clone()
            .unwrap_or_else(|| "No paper open. Press c for the contents.".to_string());
        let notice = Paragraph::new(text)
            .style(background.fg(palette.secondary))
            .alignment(Alignment::Center);
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        f.render_widget(notice, middle);
        return;
    }

    let layout = &app.layout;
    let width = layout.text_width.min(area.width);
    let column = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let active = app.active_section_position();
    let highlighted = app
        .highlight
        .as_ref()
        .and_then(|(id, _)| layout.paragraphs.iter().position(|p| &p.id == id));

    let lines: Vec<Line> = layout
        .lines
        .iter()
        .skip(app.viewport.scroll)
        .take(usize::from(area.height))
        .map(|line| {
            let style = match line.kind {
                LineKind::PaperTitle => Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
                LineKind::SectionHeading(pos) if Some(pos) == active => Style::default()
                    .fg(palette.active)
                    .add_modifier(Modifier::BOLD),
                LineKind::SectionHeading(_) => Style::default()
                    .fg(palette.secondary)
                    .add_modifier(Modifier::BOLD),
                LineKind::Text(flat) if Some(flat) == highlighted => Style::default()
                    .fg(palette.active)
                    .add_modifier(Modifier::BOLD),
                LineKind::Text(flat) if app.selection.is_some_and(|s| s.contains(flat)) => {
                    Style::default().fg(palette.text).bg(palette.hover)
                }
                LineKind::Text(_) => Style::default().fg(palette.text),
                LineKind::Notice => Style::default()
                    .fg(palette.secondary)
                    .add_modifier(Modifier::ITALIC),
                LineKind::Blank => Style::default(),
            };
            Line::styled(line.text.as_str(), style)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).style(background), column);
}

/// Draws the header over the top rows of the page.
fn draw_sticky_header(f: &mut Frame, app: &AppState, area: Rect, palette: Palette) {
    let rows = u16::try_from(app.header_offset)
        .unwrap_or(u16::MAX)
        .min(area.height);
    let Some(paper) = app.paper else {
        return;
    };
    if rows == 0 {
        return;
    }

    let header = Rect {
        height: rows,
        ..area
    };
    let place = Line::from(vec![
        Span::styled(
            paper.part().heading(),
            Style::default().fg(palette.secondary),
        ),
        Span::styled(" · ", Style::default().fg(palette.border)),
        Span::styled(paper.label(), Style::default().fg(palette.text)),
    ]);
    let section = Line::styled(
        app.tracker.current_title().unwrap_or_default().to_string(),
        Style::default()
            .fg(palette.active)
            .add_modifier(Modifier::BOLD),
    );

    let block = Block::default()
        .borders(if rows > 2 { Borders::BOTTOM } else { Borders::NONE })
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.background));
    f.render_widget(Clear, header);
    f.render_widget(
        Paragraph::new(vec![place, section])
            .block(block)
            .alignment(Alignment::Center),
        header,
    );
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect, palette: Palette) {
    let style = Style::default().bg(palette.border).fg(palette.secondary);
    let text = if app.current_view == View::Command {
        format!(":{}", app.command_buffer)
    } else if let Some(message) = &app.message {
        message.text.clone()
    } else if let Some(summary) = app.diagnostics_summary() {
        format!("{summary}  |  {HELP}")
    } else {
        HELP.to_string()
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_contents(f: &mut Frame, app: &AppState, area: Rect, palette: Palette) {
    let panel = Rect {
        width: area.width.min(52),
        ..area
    };

    let mut items = Vec::new();
    for (i, part) in PARTS.iter().enumerate() {
        items.push(ListItem::new(Line::styled(
            part.heading(),
            Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::BOLD),
        )));
        if i != app.contents.part {
            continue;
        }
        for paper in part.papers() {
            let style = if Some(paper) == app.paper {
                Style::default().fg(palette.active)
            } else {
                Style::default().fg(palette.text)
            };
            items.push(ListItem::new(Line::styled(
                format!("  {}", paper.label()),
                style,
            )));
        }
    }

    let mut state =
        ListState::default().with_selected(Some(app.contents.part + 1 + app.contents.paper));
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Contents (←/→ part, Enter open, Esc close)")
                .border_style(Style::default().fg(palette.border)),
        )
        .style(Style::default().bg(palette.background))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_widget(Clear, panel);
    f.render_stateful_widget(list, panel, &mut state);
}

fn draw_jump_menu(f: &mut Frame, app: &AppState, area: Rect, palette: Palette) {
    let Some(document) = &app.document else {
        return;
    };
    let active = app.active_section_position();

    let items: Vec<ListItem> = document
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let label = if section.is_introduction() {
                section.display_title()
            } else {
                format!("{}. {}", section.index, section.display_title())
            };
            let style = if Some(i) == active {
                Style::default()
                    .fg(palette.active)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            ListItem::new(Line::styled(label, style))
        })
        .collect();

    let height = u16::try_from(items.len() + 2).unwrap_or(u16::MAX);
    let popup = centered(area, 64, height);
    let mut state = ListState::default().with_selected(Some(app.jump_cursor));
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Sections")
                .border_style(Style::default().fg(palette.border)),
        )
        .style(Style::default().bg(palette.background))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}

fn draw_settings(f: &mut Frame, app: &AppState, area: Rect, palette: Palette) {
    let settings = app.preferences.settings();
    let items: Vec<ListItem> = SettingField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<14}", field.label()),
                    Style::default().fg(palette.secondary),
                ),
                Span::styled(
                    format!("‹ {} ›", field.value(settings)),
                    Style::default().fg(palette.text),
                ),
            ]);
            let item = ListItem::new(line);
            if i == app.settings_cursor {
                item.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                item
            }
        })
        .collect();

    let height = u16::try_from(SettingField::ALL.len() + 2).unwrap_or(u16::MAX);
    let popup = centered(area, 40, height);
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Settings (←/→ change)")
                .border_style(Style::default().fg(palette.border)),
        )
        .style(Style::default().bg(palette.background));

    f.render_widget(Clear, popup);
    f.render_widget(list, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
