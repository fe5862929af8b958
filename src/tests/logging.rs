use super::{init_logging, verbosity_to_directive, LogTarget};

#[test]
fn test_verbosity_levels() {
    assert_eq!(verbosity_to_directive(0), "warn");
    assert_eq!(verbosity_to_directive(1), "info");
    assert_eq!(verbosity_to_directive(2), "debug");
    assert_eq!(verbosity_to_directive(3), "trace");
    assert_eq!(verbosity_to_directive(255), "trace");
}

#[test]
fn test_default_target_is_disabled() {
    assert_eq!(LogTarget::default(), LogTarget::Disabled);
}

#[test]
fn test_file_target_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.log");
    init_logging(&LogTarget::File(path.clone()), 1).unwrap();
    assert!(path.exists());
}

#[test]
fn test_unopenable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("folio.log");
    assert!(init_logging(&LogTarget::File(path), 0).is_err());
}
