#![allow(clippy::unwrap_used)]
use cxlens::{
    Diagnostic, DiagnosticSet, EngineRef, Error, Index, StubEngine, TranslationUnit, UnsavedFile,
};

const NO_FLAGS: &[&str] = &[];

fn parse_source(source: &str) -> (EngineRef, Index, TranslationUnit) {
    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let unsaved = [UnsavedFile::new("test.c", source)];
    let unit =
        TranslationUnit::parse(&index, Some("test.c"), &[], &unsaved, NO_FLAGS).unwrap();
    (engine, index, unit)
}

#[test]
fn test_unrecognized_declaration_warns() {
    let (_engine, _index, unit) = parse_source("bad decl;");
    assert_eq!(unit.diagnostic_count(), 1);
    let diag = unit.diagnostic(0).unwrap();
    assert_eq!(diag.severity(), "warning");
    assert!(diag.spelling().contains("unrecognized"));

    let loc = diag.location();
    assert_eq!(loc.file.as_deref(), Some("test.c"));
    assert_eq!(loc.line, 1);
    assert_eq!(loc.column, 1);
}

#[test]
fn test_clean_parse_has_no_diagnostics() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    assert_eq!(unit.diagnostic_count(), 0);
    assert!(unit.diagnostics().next().is_none());
}

#[test]
fn test_format_honors_display_options() {
    let (_engine, _index, unit) = parse_source("bad decl;");
    let diag = unit.diagnostic(0).unwrap();

    let plain = diag.format(&["display_source_location"]);
    assert!(plain.starts_with("test.c:1: warning:"), "got {plain:?}");

    let with_column = diag.format(&["display_source_location", "display_column"]);
    assert!(with_column.starts_with("test.c:1:1: warning:"), "got {with_column:?}");
}

#[test]
fn test_format_empty_options_uses_engine_defaults() {
    let (engine, _index, unit) = parse_source("bad decl;");
    let diag = unit.diagnostic(0).unwrap();
    // The defaults include source location and column.
    assert!(diag.format(NO_FLAGS).starts_with("test.c:1:1: warning:"));

    let defaults = Diagnostic::default_display_options(&engine);
    assert!(defaults.iter().any(|s| s == "display_source_location"));
    assert!(defaults.iter().any(|s| s == "display_column"));
}

#[test]
fn test_diagnostic_set_matches_unit() {
    let (_engine, _index, unit) = parse_source("bad one; worse two;");
    let set = unit.diagnostic_set().unwrap();
    assert_eq!(set.len(), unit.diagnostic_count());
    let messages: Vec<String> = set.iter().map(|d| d.spelling()).collect();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.contains("unrecognized")));
}

#[test]
fn test_children_is_an_empty_view() {
    let (_engine, _index, unit) = parse_source("bad decl;");
    let diag = unit.diagnostic(0).unwrap();
    let children = diag.children();
    assert!(children.is_empty());
    // Dropping the view must not release anything the parent owns.
    drop(children);
    assert_eq!(diag.severity(), "warning");
}

#[test]
fn test_load_diagnostics_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diags.json");
    std::fs::write(
        &path,
        r#"[{"severity":3,"message":"boom","line":2,"column":5,"offset":10,"children":[]},
            {"severity":1,"message":"see here","line":3,"column":1,"offset":20,"children":[]}]"#,
    )
    .unwrap();

    let engine = StubEngine::new_ref();
    let set = DiagnosticSet::load(&engine, path.to_str().unwrap()).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(0).unwrap().severity(), "error");
    assert_eq!(set.get(1).unwrap().severity(), "note");
    assert!(set.get(2).is_none());
}

#[test]
fn test_load_missing_file_is_deserialization_error() {
    let engine = StubEngine::new_ref();
    let err = DiagnosticSet::load(&engine, "/no/such/diags.json").unwrap_err();
    assert!(matches!(err, Error::Deserialization(_)), "got {err:?}");
}
