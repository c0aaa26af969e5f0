#![allow(clippy::unwrap_used)]
use cxlens::{DiagnosticSet, EngineRef, Index, StubEngine, TranslationUnit, UnsavedFile};

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
fn test_unit_survives_index_disposal() {
    let (_engine, index, unit) = parse_source("int x = 1;");
    drop(index);
    // The unit holds no reference to the index; everything still works.
    assert_eq!(unit.spelling(), "test.c");
    assert_eq!(unit.cursor().children().len(), 1);
}

#[test]
fn test_cursor_copies_stay_valid() {
    let (_engine, _index, unit) = parse_source("int a; int b; int c;");
    let stashed: Vec<_> = unit.cursor().children();
    let names: Vec<String> = stashed.iter().map(|c| c.spelling()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    // Copies are interchangeable with the originals.
    let again = unit.cursor().children();
    assert_eq!(stashed[1], again[1]);
}

#[test]
fn test_each_diagnostic_fetch_is_independent() {
    // Two unrecognized chunks produce two warnings.
    let (_engine, _index, unit) = parse_source("bad one; worse two;");
    assert_eq!(unit.diagnostic_count(), 2);

    let first = unit.diagnostic(0).unwrap();
    let first_again = unit.diagnostic(0).unwrap();
    drop(first);
    // Dropping one fetch leaves the other fully usable.
    assert!(first_again.spelling().contains("unrecognized"));
    assert!(unit.diagnostic(2).is_none());
}

#[test]
fn test_token_sets_release_independently() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    let extent = unit.cursor().extent();
    {
        let tokens = unit.tokenize(extent);
        assert_eq!(tokens.len(), 5);
    }
    // The first array is gone; a fresh tokenize call starts clean.
    let tokens = unit.tokenize(extent);
    let second = unit.tokenize(extent);
    assert_eq!(tokens.len(), second.len());
}

#[test]
fn test_loaded_diagnostic_set_owes_nothing_to_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diags.json");
    std::fs::write(
        &path,
        r#"[{"severity":3,"message":"boom","line":2,"column":5,"offset":10,"children":[]}]"#,
    )
    .unwrap();

    let engine = StubEngine::new_ref();
    let set = DiagnosticSet::load(&engine, path.to_str().unwrap()).unwrap();
    assert_eq!(set.len(), 1);
    let diag = set.get(0).unwrap();
    assert_eq!(diag.severity(), "error");
    assert_eq!(diag.spelling(), "boom");
    let loc = diag.location();
    assert_eq!(loc.file, None);
    assert_eq!(loc.line, 2);
}

#[test]
fn test_two_units_from_one_index() {
    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let a = TranslationUnit::parse(
        &index,
        Some("a.c"),
        &[],
        &[UnsavedFile::new("a.c", "int a;")],
        NO_FLAGS,
    )
    .unwrap();
    let b = TranslationUnit::parse(
        &index,
        Some("b.c"),
        &[],
        &[UnsavedFile::new("b.c", "int b;")],
        NO_FLAGS,
    )
    .unwrap();
    drop(a);
    // Disposing one unit leaves its sibling intact.
    assert_eq!(b.cursor().children()[0].spelling(), "b");
}
