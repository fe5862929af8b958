use super::{text_width, LineKind, PageLayout};
use crate::diagnostic::Diagnostic;
use crate::parser::parse_document;
use crate::record::ContentRecord;
use crate::section::Document;
use crate::theme::{FontFamily, LineSpacing, ThemeSettings};
use crate::tracker::Anchor;

const TITLE: &str = "Paper 1: The Universal Father";

fn document() -> Document {
    let records = [
        ContentRecord::section_title("001.0", ""),
        ContentRecord::paragraph("001.0", "Intro."),
        ContentRecord::section_title("001.2", "Two"),
        ContentRecord::paragraph("001.2", "First."),
        ContentRecord::paragraph("001.2", "Second."),
    ];
    let mut sink: Vec<Diagnostic> = Vec::new();
    parse_document("1", &records, &mut sink)
}

fn layout() -> PageLayout {
    PageLayout::build(&document(), TITLE, &ThemeSettings::default(), 40, 2)
}

fn texts(layout: &PageLayout) -> Vec<&str> {
    layout.lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn test_rows() {
    let layout = layout();
    assert_eq!(layout.text_width, 32);
    assert_eq!(
        texts(&layout),
        [
            "", "", TITLE, "", "INTRODUCTION", "", "Intro.", "", "2. TWO", "", "First.", "",
            "Second.", "",
        ]
    );
    assert_eq!(layout.lines[2].kind, LineKind::PaperTitle);
    assert_eq!(layout.lines[8].kind, LineKind::SectionHeading(1));
    assert_eq!(layout.lines[12].kind, LineKind::Text(2));
    assert_eq!(layout.height(), 14);
}

#[test]
fn test_section_spans_are_contiguous() {
    let layout = layout();
    let spans: Vec<_> = layout
        .sections
        .iter()
        .map(|s| (s.id.as_str(), s.title.as_str(), s.top, s.bottom))
        .collect();
    assert_eq!(
        spans,
        [
            ("section-0", "Introduction", 4, 8),
            ("section-2", "Two", 8, 14),
        ]
    );
    assert_eq!(layout.section_anchor("section-2"), Some(Anchor { top: 8 }));
    assert_eq!(layout.section_anchor("section-9"), None);
}

#[test]
fn test_paragraph_spans() {
    let layout = layout();
    let second = layout.paragraph("p-001-2-2").unwrap();
    assert_eq!((second.top, second.bottom), (12, 13));
    assert_eq!(second.section, 1);
    assert_eq!(second.ordinal, 2);

    assert_eq!(layout.paragraph_at(0), Some(0));
    assert_eq!(layout.paragraph_at(8), Some(1));
    assert_eq!(layout.paragraph_at(13), None);
}

#[test]
fn test_visibility_at_top() {
    let events = layout().visibility(0, 10, 2);
    let summary: Vec<_> = events
        .iter()
        .map(|e| (e.id.as_str(), e.is_intersecting, e.top_distance))
        .collect();
    assert_eq!(summary, [("section-0", true, 2), ("section-2", true, 6)]);
}

#[test]
fn test_visibility_hides_sections_under_header() {
    let events = layout().visibility(6, 10, 2);
    let summary: Vec<_> = events
        .iter()
        .map(|e| (e.id.as_str(), e.is_intersecting, e.top_distance))
        .collect();
    assert_eq!(summary, [("section-0", false, -4), ("section-2", true, 0)]);
}

#[test]
fn test_empty_document_notice() {
    let empty = Document {
        paper_number: "001".to_string(),
        sections: Vec::new(),
    };
    let layout = PageLayout::build(&empty, TITLE, &ThemeSettings::default(), 40, 0);
    assert!(layout.sections.is_empty());
    let last = layout.lines.last().unwrap();
    assert_eq!(last.kind, LineKind::Notice);
    assert_eq!(last.text, "No content for this paper.");
}

#[test]
fn test_theme_changes_layout() {
    let settings = ThemeSettings {
        font_family: FontFamily::Serif,
        line_spacing: LineSpacing::Compact,
        ..ThemeSettings::default()
    };
    let layout = PageLayout::build(&document(), TITLE, &settings, 40, 0);
    let rows = texts(&layout);
    assert!(rows.contains(&"    First."));
    let first = rows.iter().position(|r| *r == "    First.").unwrap();
    assert_eq!(rows[first + 1], "    Second.");
}

#[test]
fn test_long_paragraphs_wrap() {
    let records = [
        ContentRecord::section_title("001.1", "One"),
        ContentRecord::paragraph("001.1", &"word ".repeat(40)),
    ];
    let mut sink: Vec<Diagnostic> = Vec::new();
    let document = parse_document("1", &records, &mut sink);
    let layout = PageLayout::build(&document, TITLE, &ThemeSettings::default(), 40, 0);

    let span = &layout.paragraphs[0];
    assert!(span.bottom - span.top > 1);
    assert!(layout.lines.iter().all(|l| l.text.chars().count() <= 32));
}

#[test]
fn test_text_width_bounds() {
    let settings = ThemeSettings::default();
    assert_eq!(text_width(&settings, 200), 88);
    assert_eq!(text_width(&settings, 40), 32);
    assert_eq!(text_width(&settings, 10), 16);
}
