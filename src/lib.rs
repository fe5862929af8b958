//! folio: a terminal reader for a book published as papers, sections and paragraphs.
//!
//! Paper content arrives as a flat array of JSON records. [`parser::parse_document`]
//! turns those into a [`section::Document`], [`layout::PageLayout`] lays it out as
//! terminal rows, and [`tracker::ActiveSectionTracker`] decides which section the
//! reader is in as the page scrolls.
#![allow(clippy::multiple_crate_versions)]

/// Reader session state and navigation.
pub mod app_state;
/// Parts and papers of the book.
pub mod catalog;
/// Copying paragraphs with their citation.
pub mod clipboard;
/// Configuration loaded from folio.toml.
pub mod config;
/// Non-fatal content problems.
pub mod diagnostic;
/// Error types and exit codes.
pub mod error;
/// Rows occupied by sections and paragraphs.
pub mod layout;
/// Log output setup.
pub mod logging;
/// Grouping records into sections.
pub mod parser;
/// Raw content records.
pub mod record;
/// Paragraph references and deep links.
pub mod reference;
/// Parsed document model.
pub mod section;
/// Where paper records come from.
pub mod source;
/// Display preferences.
pub mod theme;
/// Active-section tracking.
pub mod tracker;
/// Terminal rendering.
pub mod ui;
