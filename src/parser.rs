//! Builds the paper/section/paragraph hierarchy from flat content records.
//!
//! Grouping is by shared section key, not by stream position, so paragraphs
//! land in the right section even when the export interleaves them. Nothing is
//! dropped silently: malformed keys are reported and skipped, and paragraphs
//! whose section has no title record become a trailing untitled section.

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::record::{ContentRecord, RecordKind, SectionKey};
use crate::section::{Document, Paragraph, Section};
use std::collections::HashMap;

/// Parses one paper's records into a [`Document`].
///
/// The result is deterministic: the same input always yields the same
/// sections, ordering and ids. Sections are ordered by numeric index with the
/// introduction (`"0"`) first.
#[must_use]
pub fn parse_document(
    paper_number: &str,
    records: &[ContentRecord],
    sink: &mut dyn DiagnosticSink,
) -> Document {
    let paper_number = pad_paper_number(paper_number);

    let mut sections: Vec<Section> = Vec::new();
    let mut section_positions: HashMap<u32, usize> = HashMap::new();
    let mut groups: Vec<(u32, Vec<&str>)> = Vec::new();
    let mut group_positions: HashMap<u32, usize> = HashMap::new();

    for (position, record) in records.iter().enumerate() {
        match &record.kind {
            RecordKind::SectionTitle => {
                let Some(number) = locate(position, record, sink) else {
                    continue;
                };
                if let Some(&existing) = section_positions.get(&number) {
                    sink.report(Diagnostic::DuplicateSection {
                        position,
                        section_index: number.to_string(),
                    });
                    let section = &mut sections[existing];
                    if section.title.is_empty() {
                        section.title.clone_from(&record.text);
                    }
                    continue;
                }
                section_positions.insert(number, sections.len());
                sections.push(Section::new(&number.to_string(), &record.text));
            }
            RecordKind::Paragraph => {
                let Some(number) = locate(position, record, sink) else {
                    continue;
                };
                let slot = *group_positions.entry(number).or_insert_with(|| {
                    groups.push((number, Vec::new()));
                    groups.len() - 1
                });
                groups[slot].1.push(record.text.as_str());
            }
            RecordKind::Other(kind) => {
                tracing::trace!(position, kind = kind.as_str(), "ignoring record");
            }
        }
    }

    if sections.is_empty() && group_positions.contains_key(&0) {
        section_positions.insert(0, 0);
        sections.push(Section::new("0", ""));
    }

    for (number, texts) in groups {
        let slot = if let Some(&slot) = section_positions.get(&number) {
            slot
        } else {
            sink.report(Diagnostic::OrphanParagraphGroup {
                section_index: number.to_string(),
                paragraphs: texts.len(),
            });
            section_positions.insert(number, sections.len());
            sections.push(Section::new(&number.to_string(), ""));
            sections.len() - 1
        };

        let section = &mut sections[slot];
        let index = section.index.clone();
        section.paragraphs = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Paragraph {
                id: Paragraph::anchor_id(&paper_number, &index, i + 1),
                ordinal: i + 1,
                text: text.to_string(),
            })
            .collect();
    }

    sections.sort_by_key(|s| (!s.is_introduction(), s.number()));

    tracing::debug!(
        paper = paper_number.as_str(),
        records = records.len(),
        sections = sections.len(),
        "parsed document"
    );

    Document {
        paper_number,
        sections,
    }
}

/// Resolves the section number a record belongs to.
///
/// A paragraph without any key belongs to the introduction. A key that is
/// present but malformed excludes the record.
fn locate(position: usize, record: &ContentRecord, sink: &mut dyn DiagnosticSink) -> Option<u32> {
    let raw = record
        .section_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    match raw {
        None if record.kind == RecordKind::Paragraph => Some(0),
        None => {
            sink.report(Diagnostic::MalformedRecord {
                position,
                reason: "section title has no section key".to_string(),
            });
            None
        }
        Some(raw) => match SectionKey::parse(raw) {
            Ok(key) => Some(key.section),
            Err(e) => {
                sink.report(Diagnostic::MalformedRecord {
                    position,
                    reason: format!("{e}: '{raw}'"),
                });
                None
            }
        },
    }
}

/// Zero-pads a numeric paper number to three digits.
#[must_use]
pub fn pad_paper_number(paper_number: &str) -> String {
    let trimmed = paper_number.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        format!("{trimmed:0>3}")
    } else {
        tracing::warn!(paper = trimmed, "paper number is not numeric");
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
