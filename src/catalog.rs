//! The book's table of contents: parts and the papers they contain.

use crate::error::ReferenceError;
use std::fmt;
use std::str::FromStr;

/// Number of the last paper in the book.
pub const LAST_PAPER: u16 = 196;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A paper that exists in the book (0 is the Foreword).
pub struct PaperNumber(u16);

impl PaperNumber {
    /// The Foreword.
    pub const FOREWORD: Self = Self(0);

    #[must_use]
    /// Validates a paper number.
    pub fn new(number: u16) -> Option<Self> {
        (number <= LAST_PAPER).then_some(Self(number))
    }

    #[must_use]
    /// The plain paper number.
    pub fn get(self) -> u16 {
        self.0
    }

    #[must_use]
    /// Zero-padded form used in file names and ids.
    pub fn padded(self) -> String {
        format!("{:03}", self.0)
    }

    #[must_use]
    /// The following paper, if any.
    pub fn following(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    #[must_use]
    /// The preceding paper, if any.
    pub fn preceding(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    #[must_use]
    /// Human-readable label: "Foreword", "Paper N: Title" or "Paper N".
    pub fn label(self) -> String {
        if self == Self::FOREWORD {
            return "Foreword".to_string();
        }
        match paper_title(self) {
            Some(title) => format!("Paper {}: {title}", self.0),
            None => format!("Paper {}", self.0),
        }
    }

    #[must_use]
    /// The part containing this paper.
    pub fn part(self) -> &'static Part {
        PARTS
            .iter()
            .find(|p| p.contains(self))
            .unwrap_or(&PARTS[PARTS.len() - 1])
    }
}

impl fmt::Display for PaperNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PaperNumber {
    type Err = ReferenceError;

    /// Accepts padded or unpadded digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReferenceError::Syntax(s.to_string()));
        }
        let number: u16 = s
            .parse()
            .map_err(|_| ReferenceError::Syntax(s.to_string()))?;
        Self::new(number).ok_or(ReferenceError::UnknownPaper(number))
    }
}

#[derive(Debug, PartialEq, Eq)]
/// One of the four parts of the book.
pub struct Part {
    /// Roman numeral.
    pub numeral: &'static str,
    /// Part title.
    pub title: &'static str,
    first: u16,
    last: u16,
}

impl Part {
    #[must_use]
    /// Whether `paper` belongs to this part.
    pub fn contains(&self, paper: PaperNumber) -> bool {
        (self.first..=self.last).contains(&paper.0)
    }

    /// Papers in this part, in order.
    pub fn papers(&self) -> impl Iterator<Item = PaperNumber> {
        (self.first..=self.last).map(PaperNumber)
    }

    #[must_use]
    /// Heading shown in the contents, e.g. "PART I. THE LOCAL UNIVERSE".
    pub fn heading(&self) -> String {
        format!("PART {}. {}", self.numeral, self.title.to_uppercase())
    }
}

/// Parts of the book in order.
pub static PARTS: [Part; 4] = [
    Part {
        numeral: "I",
        title: "The Central and Superuniverses",
        first: 0,
        last: 31,
    },
    Part {
        numeral: "II",
        title: "The Local Universe",
        first: 32,
        last: 56,
    },
    Part {
        numeral: "III",
        title: "The History of Urantia",
        first: 57,
        last: 119,
    },
    Part {
        numeral: "IV",
        title: "The Life and Teachings of Jesus",
        first: 120,
        last: LAST_PAPER,
    },
];

fn paper_title(paper: PaperNumber) -> Option<&'static str> {
    match paper.0 {
        1 => Some("The Universal Father"),
        2 => Some("The Nature of God"),
        3 => Some("The Attributes of God"),
        4 => Some("God's Relation to the Universe"),
        5 => Some("God's Relation to the Individual"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/catalog.rs"]
mod tests;
