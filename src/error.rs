//! Error types shared by the reader.
//!
//! Nothing in the document core is fatal: parse problems are routed through
//! [`crate::diagnostic::DiagnosticSink`] and the tracker reports unknown jump
//! targets as values. The types here cover the collaborators around the core
//! (fetching, configuration, persisted preferences) and the binary's exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the `folio` binary.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    pub const ERROR: i32 = 1;

    /// Configuration or preferences could not be loaded.
    pub const CONFIG_ERROR: i32 = 2;

    /// Terminal or file I/O failed.
    pub const IO_ERROR: i32 = 3;

    /// Content for the requested paper could not be fetched.
    pub const FETCH_ERROR: i32 = 4;

    /// Invalid arguments.
    pub const USAGE_ERROR: i32 = 64;
}

#[derive(Debug, Error)]
/// Top-level error for reader operations.
pub enum ReaderError {
    /// Configuration loading error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Persisted display preferences error.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Content fetch error.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Deep link could not be parsed or resolved.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReaderError {
    #[must_use]
    /// Maps each error to the exit code the binary reports.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Settings(_) => ExitCode::CONFIG_ERROR,
            Self::Fetch(_) => ExitCode::FETCH_ERROR,
            Self::Reference(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

#[derive(Debug, Error)]
/// Failure to produce the raw records for a paper.
pub enum FetchError {
    /// No document exists for the paper.
    #[error("no content for paper {paper}: {path} does not exist")]
    NotFound {
        /// Zero-padded paper number.
        paper: String,
        /// Location that was looked up.
        path: PathBuf,
    },

    /// The asset could not be transferred.
    #[error("failed to read content for paper {paper}: {source}")]
    Network {
        /// Zero-padded paper number.
        paper: String,
        /// Underlying transport failure.
        #[source]
        source: std::io::Error,
    },

    /// The asset was read but is not a JSON record array.
    #[error("content for paper {paper} is not a record array: {message}")]
    Parse {
        /// Zero-padded paper number.
        paper: String,
        /// Decoder message.
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures reported by the active-section tracker.
pub enum TrackerError {
    /// The jump target is not a registered section.
    #[error("section not found: {0}")]
    SectionNotFound(String),
}

#[derive(Debug, Error)]
/// Failure to load `folio.toml`.
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
/// Failure to read or write persisted display preferences.
pub enum SettingsError {
    /// Preferences file I/O failed.
    #[error("preferences I/O error at {path}: {source}")]
    Io {
        /// Preferences file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Stored preferences are not valid JSON for the current schema.
    #[error("invalid stored preferences: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure to parse or resolve a paragraph reference.
pub enum ReferenceError {
    /// The text is not a reference.
    #[error("invalid reference '{0}': expected P, P:S, P:S.N or /paper/P/section/S/paragraph/N")]
    Syntax(String),

    /// The paper number is outside the book.
    #[error("paper {0} is not part of the book")]
    UnknownPaper(u16),

    /// The document has no such section.
    #[error("paper {paper} has no section {section}")]
    UnknownSection {
        /// Zero-padded paper number.
        paper: String,
        /// Section index.
        section: String,
    },

    /// The section has no such paragraph.
    #[error("section {section} of paper {paper} has no paragraph {paragraph}")]
    UnknownParagraph {
        /// Zero-padded paper number.
        paper: String,
        /// Section index.
        section: String,
        /// Paragraph ordinal.
        paragraph: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure to place text on the clipboard.
pub enum ClipboardError {
    /// No clipboard could be opened.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard refused the text.
    #[error("failed to copy text: {0}")]
    Rejected(String),
}
