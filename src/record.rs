//! Content records as delivered by the content pipeline.
//!
//! Each paper is published as a JSON array of flat records tagged with a
//! `type`, a compound `paperSectionId` and a `text` payload. Decoding turns
//! those loosely-typed values into [`ContentRecord`]s; anything that cannot be
//! decoded is reported as a [`Diagnostic::MalformedRecord`] instead of leaking
//! missing fields into the parser.

use crate::diagnostic::{Diagnostic, DiagnosticSink};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a record contributes to the document.
pub enum RecordKind {
    /// Title of a section; the text is the heading.
    SectionTitle,
    /// Body paragraph.
    Paragraph,
    /// Any other record type; ignored when structuring.
    Other(String),
}

impl RecordKind {
    #[must_use]
    /// Maps a wire `type` tag to a kind.
    ///
    /// Older exports tag titles as `section`, so both spellings are accepted.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "section_title" | "section" => Self::SectionTitle,
            "paragraph" => Self::Paragraph,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One validated record from a paper's JSON document.
pub struct ContentRecord {
    /// Record type.
    pub kind: RecordKind,
    /// Raw `"<paperId>.<sectionIndex>"` key, if the record carried one.
    pub section_key: Option<String>,
    /// Title text or paragraph body.
    pub text: String,
}

impl ContentRecord {
    #[must_use]
    /// Builds a section title record.
    pub fn section_title(section_key: &str, text: &str) -> Self {
        Self {
            kind: RecordKind::SectionTitle,
            section_key: Some(section_key.to_string()),
            text: text.to_string(),
        }
    }

    #[must_use]
    /// Builds a paragraph record.
    pub fn paragraph(section_key: &str, text: &str) -> Self {
        Self {
            kind: RecordKind::Paragraph,
            section_key: Some(section_key.to_string()),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
/// Why a `paperSectionId` could not be split.
pub enum KeyError {
    /// There is no `.` between paper and section.
    #[error("section key has no '.' separator")]
    MissingSeparator,
    /// The paper part is empty or not all digits.
    #[error("paper part of section key is not numeric")]
    NonNumericPaper,
    /// The section part is empty or not all digits.
    #[error("section part of section key is not numeric")]
    NonNumericSection,
    /// The section part does not fit a section number.
    #[error("section part of section key is out of range")]
    SectionOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A parsed `"<paperId>.<sectionIndex>"` key.
pub struct SectionKey {
    /// Paper part as written (normally zero-padded).
    pub paper: String,
    /// Section number; 0 is the introduction.
    pub section: u32,
}

impl SectionKey {
    /// Splits a raw key at its first `.`.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if the separator is missing or either part is
    /// not a run of ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let (paper, section) = raw
            .split_once('.')
            .ok_or(KeyError::MissingSeparator)?;

        if !is_digits(paper) {
            return Err(KeyError::NonNumericPaper);
        }
        if !is_digits(section) {
            return Err(KeyError::NonNumericSection);
        }
        let section = section
            .parse::<u32>()
            .map_err(|_| KeyError::SectionOutOfRange)?;

        Ok(Self {
            paper: paper.to_string(),
            section,
        })
    }

    #[must_use]
    /// Unpadded section index used in ids.
    pub fn index(&self) -> String {
        self.section.to_string()
    }
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, rename = "paperSectionId")]
    paper_section_id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl From<RawRecord> for ContentRecord {
    fn from(raw: RawRecord) -> Self {
        Self {
            kind: RecordKind::from_tag(&raw.kind),
            section_key: raw.paper_section_id,
            text: raw.text.or(raw.title).unwrap_or_default(),
        }
    }
}

/// Decodes a paper's JSON document into records.
///
/// Individual values that are not record objects are reported to `sink` and
/// skipped; their positions refer to the JSON array.
///
/// # Errors
///
/// Returns an error if `json` is not a JSON array.
pub fn decode_records(
    json: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<ContentRecord>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut records = Vec::with_capacity(values.len());

    for (position, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawRecord>(value) {
            Ok(raw) => records.push(raw.into()),
            Err(e) => sink.report(Diagnostic::MalformedRecord {
                position,
                reason: e.to_string(),
            }),
        }
    }

    Ok(records)
}

#[cfg(test)]
#[path = "tests/record.rs"]
mod tests;
