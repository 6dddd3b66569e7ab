use sdfparse::*;

const SDF_COUNTER: &str = include_str!("counter.sdf");

#[test]
fn test_load_str() {
    let mut loader = Loader::with_reporter(CollectReporter::default());
    assert!(loader.load_str(SDF_COUNTER, "counter.sdf"));
    assert!(loader.reporter().error().is_none());
    assert_eq!(loader.delayfile().map(|d| d.cells.len()), Some(4));
}

#[test]
fn test_load_failure_reports_location() {
    let mut loader = Loader::with_reporter(CollectReporter::default());
    assert!(!loader.load_str("(DELAYFILE (SDFVERSION \"3.0\")", "broken.sdf"));
    assert!(loader.delayfile().is_none());
    let e = loader.reporter_mut().take_error().unwrap();
    assert_eq!(e.kind, SDFErrorKind::Syntax);
    assert_eq!(e.location, Location::new("broken.sdf", 1, 30));
    assert_eq!(e.to_string(),
               "broken.sdf:1:30: syntax error: expected '(' or ')', found end of input");
}

#[test]
fn test_failure_drops_previous_document() {
    let mut loader = Loader::with_reporter(CollectReporter::default());
    assert!(loader.load_str(SDF_COUNTER, "counter.sdf"));
    assert!(!loader.load_str("(DELAYFILE", "broken.sdf"));
    assert!(loader.delayfile().is_none());
    assert!(loader.into_delayfile().is_none());
}

#[test]
fn test_load_reader_default_name() {
    let mut loader = Loader::with_reporter(CollectReporter::default());
    assert!(!loader.load_reader("(CELL)".as_bytes(), None));
    let e = loader.reporter().error().unwrap();
    assert_eq!(e.location.filename, sdfparse::loader::DEFAULT_STREAM_NAME);
    assert_eq!((e.location.line, e.location.column), (1, 2));

    assert!(loader.load_reader(SDF_COUNTER.as_bytes(), Some("counter.sdf")));
    assert_eq!(loader.delayfile().unwrap().header.design(), "counter");
}

#[test]
fn test_load_missing_file() {
    let mut errors = Vec::new();
    let mut loader = Loader::with_reporter(|e: SDFError| errors.push(e));
    assert!(!loader.load_file("/nonexistent/dir/missing.sdf"));
    drop(loader);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SDFErrorKind::Io);
    assert_eq!(errors[0].location.filename, "/nonexistent/dir/missing.sdf");
    assert_eq!(errors[0].location.line, 0);
}

#[test]
fn test_load_file_round_trip() {
    let path = std::env::temp_dir().join(format!("sdfparse_loader_{}.sdf", std::process::id()));
    let sdf = SDFDelayFile::parse_str(SDF_COUNTER).unwrap();
    write::save(&sdf, &path).unwrap();

    let mut loader = Loader::new();
    assert!(loader.load_file(&path));
    assert_eq!(loader.delayfile(), Some(&sdf));
    assert_eq!(SDFDelayFile::parse_file(&path).unwrap(), sdf);
    std::fs::remove_file(&path).unwrap();
}
