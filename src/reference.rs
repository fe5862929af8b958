//! Deep links to a paper, section or paragraph.
//!
//! References are written `P`, `P:S` or `P:S.N`, or in route form
//! `/paper/P/section/S/paragraph/N`.

use crate::catalog::PaperNumber;
use crate::error::ReferenceError;
use crate::section::{Document, Section};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A location in the book.
pub struct Reference {
    /// Paper to open.
    pub paper: PaperNumber,
    /// Section number within the paper.
    pub section: Option<u32>,
    /// Paragraph ordinal within the section; only set with a section.
    pub paragraph: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a reference points at inside a loaded document.
pub enum Target {
    /// The top of the paper.
    Paper,
    /// A section anchor id.
    Section(String),
    /// A paragraph anchor id and its section's anchor id.
    Paragraph {
        /// Section anchor id.
        section: String,
        /// Paragraph anchor id.
        paragraph: String,
    },
}

impl Reference {
    #[must_use]
    /// A reference to the top of a paper.
    pub fn paper(paper: PaperNumber) -> Self {
        Self {
            paper,
            section: None,
            paragraph: None,
        }
    }

    /// Finds the anchors this reference points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no such section or paragraph.
    pub fn resolve(&self, document: &Document) -> Result<Target, ReferenceError> {
        let Some(section_number) = self.section else {
            return Ok(Target::Paper);
        };
        let index = section_number.to_string();
        let section = document
            .section_by_index(&index)
            .ok_or_else(|| ReferenceError::UnknownSection {
                paper: document.paper_number.clone(),
                section: index.clone(),
            })?;

        let Some(ordinal) = self.paragraph else {
            return Ok(Target::Section(section.id.clone()));
        };
        let paragraph = section
            .paragraphs
            .iter()
            .find(|p| p.ordinal == ordinal)
            .ok_or_else(|| ReferenceError::UnknownParagraph {
                paper: document.paper_number.clone(),
                section: index,
                paragraph: ordinal,
            })?;

        Ok(Target::Paragraph {
            section: section.id.clone(),
            paragraph: paragraph.id.clone(),
        })
    }

    #[must_use]
    /// Reference for a paragraph of a loaded document.
    pub fn for_paragraph(paper: PaperNumber, section: &Section, ordinal: usize) -> Self {
        Self {
            paper,
            section: Some(section.number()),
            paragraph: Some(ordinal),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.paper)?;
        if let Some(section) = self.section {
            write!(f, ":{section}")?;
            if let Some(paragraph) = self.paragraph {
                write!(f, ".{paragraph}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let syntax = || ReferenceError::Syntax(s.to_string());

        let (paper, section, paragraph) = if s.starts_with('/') {
            let parts: Vec<&str> = s.split('/').filter(|p| !p.is_empty()).collect();
            match parts.as_slice() {
                ["paper", p] => (*p, None, None),
                ["paper", p, "section", sec] => (*p, Some(*sec), None),
                ["paper", p, "section", sec, "paragraph", n] => (*p, Some(*sec), Some(*n)),
                _ => return Err(syntax()),
            }
        } else {
            match s.split_once(':') {
                None => (s, None, None),
                Some((p, rest)) => match rest.split_once('.') {
                    None => (p, Some(rest), None),
                    Some((sec, n)) => (p, Some(sec), Some(n)),
                },
            }
        };

        let paper = match paper.parse::<PaperNumber>() {
            Err(ReferenceError::Syntax(_)) => return Err(syntax()),
            other => other?,
        };
        let section = section
            .map(|sec| parse_number::<u32>(sec).ok_or_else(syntax))
            .transpose()?;
        let paragraph = paragraph
            .map(|n| {
                parse_number::<usize>(n)
                    .filter(|&n| n >= 1)
                    .ok_or_else(syntax)
            })
            .transpose()?;

        Ok(Self {
            paper,
            section,
            paragraph,
        })
    }
}

fn parse_number<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
#[path = "tests/reference.rs"]
mod tests;
