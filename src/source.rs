//! Where a paper's raw records come from.
//!
//! Papers are published as static JSON assets named by zero-padded paper
//! number (`001.json`). The reader asks a [`RecordSource`] for a paper's
//! records and hands them, already materialised, to the parser.

use crate::catalog::PaperNumber;
use crate::diagnostic::DiagnosticSink;
use crate::error::FetchError;
use crate::record::{decode_records, ContentRecord};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::{fmt, fs};

/// Supplies the raw records of a paper.
pub trait RecordSource {
    /// Fetches and decodes the records for `paper`.
    ///
    /// Records that fail to decode individually are reported to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] if the paper has no document,
    /// [`FetchError::Network`] if it could not be transferred and
    /// [`FetchError::Parse`] if it is not a record array.
    fn fetch_records(
        &self,
        paper: PaperNumber,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<ContentRecord>, FetchError>;
}

#[derive(Clone, Debug)]
/// Reads `<root>/<NNN>.json` files.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    /// Serves papers from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    /// Location of a paper's document.
    pub fn path_for(&self, paper: PaperNumber) -> PathBuf {
        self.root.join(format!("{}.json", paper.padded()))
    }
}

impl RecordSource for DirectorySource {
    fn fetch_records(
        &self,
        paper: PaperNumber,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<ContentRecord>, FetchError> {
        let path = self.path_for(paper);
        tracing::debug!(path = %path.display(), "fetching paper");

        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FetchError::NotFound {
                    paper: paper.padded(),
                    path: path.clone(),
                }
            } else {
                FetchError::Network {
                    paper: paper.padded(),
                    source,
                }
            }
        })?;

        decode_records(&content, sink).map_err(|e| FetchError::Parse {
            paper: paper.padded(),
            message: e.to_string(),
        })
    }
}

#[derive(Clone, Default)]
/// Serves papers from memory.
pub struct StaticSource {
    papers: HashMap<PaperNumber, Vec<ContentRecord>>,
}

impl StaticSource {
    #[must_use]
    /// Adds a paper's records.
    pub fn with_paper(mut self, paper: PaperNumber, records: Vec<ContentRecord>) -> Self {
        self.papers.insert(paper, records);
        self
    }
}

impl fmt::Debug for StaticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSource")
            .field("papers", &self.papers.len())
            .finish()
    }
}

impl RecordSource for StaticSource {
    fn fetch_records(
        &self,
        paper: PaperNumber,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<ContentRecord>, FetchError> {
        self.papers
            .get(&paper)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                paper: paper.padded(),
                path: PathBuf::from(format!("memory:{}", paper.padded())),
            })
    }
}

#[cfg(test)]
#[path = "tests/source.rs"]
mod tests;
