use super::{DirectorySource, RecordSource, StaticSource};
use crate::catalog::PaperNumber;
use crate::diagnostic::Diagnostic;
use crate::error::FetchError;
use crate::record::ContentRecord;
use std::fs;

fn paper(n: u16) -> PaperNumber {
    PaperNumber::new(n).unwrap()
}

#[test]
fn test_path_for_pads_number() {
    let source = DirectorySource::new("json");
    assert_eq!(
        source.path_for(paper(7)),
        std::path::Path::new("json").join("007.json")
    );
}

#[test]
fn test_directory_source_reads_records() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("001.json"),
        r#"[
            {"type": "section_title", "paperSectionId": "001.0", "text": ""},
            {"type": "paragraph", "paperSectionId": "001.0", "text": "Opening."},
            "stray"
        ]"#,
    )
    .unwrap();

    let source = DirectorySource::new(dir.path());
    let mut sink: Vec<Diagnostic> = Vec::new();
    let records = source.fetch_records(paper(1), &mut sink).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1], ContentRecord::paragraph("001.0", "Opening."));
    assert!(matches!(
        sink.as_slice(),
        [Diagnostic::MalformedRecord { position: 2, .. }]
    ));
}

#[test]
fn test_directory_source_missing_paper() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path());
    let mut sink: Vec<Diagnostic> = Vec::new();

    let err = source.fetch_records(paper(3), &mut sink).unwrap_err();
    match err {
        FetchError::NotFound { paper, path } => {
            assert_eq!(paper, "003");
            assert_eq!(path, dir.path().join("003.json"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_directory_source_not_an_array() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("002.json"), "{}").unwrap();
    let source = DirectorySource::new(dir.path());
    let mut sink: Vec<Diagnostic> = Vec::new();

    let err = source.fetch_records(paper(2), &mut sink).unwrap_err();
    assert!(matches!(err, FetchError::Parse { ref paper, .. } if paper == "002"));
}

#[test]
fn test_directory_source_unreadable_path() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the file should be
    fs::create_dir(dir.path().join("004.json")).unwrap();
    let source = DirectorySource::new(dir.path());
    let mut sink: Vec<Diagnostic> = Vec::new();

    let err = source.fetch_records(paper(4), &mut sink).unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }));
}

#[test]
fn test_static_source() {
    let records = vec![ContentRecord::section_title("005.1", "One")];
    let source = StaticSource::default().with_paper(paper(5), records.clone());
    let mut sink: Vec<Diagnostic> = Vec::new();

    assert_eq!(source.fetch_records(paper(5), &mut sink).unwrap(), records);
    assert!(matches!(
        source.fetch_records(paper(6), &mut sink),
        Err(FetchError::NotFound { .. })
    ));
}
