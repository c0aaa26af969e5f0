#![allow(clippy::unwrap_used)]
use cxlens::{Error, EngineRef, Index, StubEngine, TranslationUnit, UnsavedFile};

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
fn test_parse_reports_spelling_and_root() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    assert_eq!(unit.spelling(), "test.c");
    let root = unit.cursor();
    assert_eq!(root.kind(), "translation_unit");
}

#[test]
fn test_simple_var_declaration() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    let children = unit.cursor().children();
    assert_eq!(children.len(), 1);
    let var = children[0];
    assert_eq!(var.kind(), "var_decl");
    assert_eq!(var.spelling(), "x");

    let grandchildren = var.children();
    assert_eq!(grandchildren.len(), 1);
    assert_eq!(grandchildren[0].kind(), "integer_literal");
    assert_eq!(grandchildren[0].spelling(), "1");
}

#[test]
fn test_parse_missing_file_fails() {
    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let err = TranslationUnit::parse(&index, Some("/no/such/file.c"), &[], &[], NO_FLAGS)
        .unwrap_err();
    assert!(matches!(err, Error::CreateFailed(_)), "got {err:?}");
}

#[test]
fn test_parse_without_source_is_invalid_arguments() {
    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let err = TranslationUnit::parse(&index, None, &[], &[], NO_FLAGS).unwrap_err();
    assert!(matches!(err, Error::InvalidArguments), "got {err:?}");
}

#[test]
fn test_engine_crash_maps_to_error() {
    let engine = StubEngine::new_ref();
    cxlens::toggle_crash_recovery(&engine, true);
    let index = Index::new(&engine, false, false);
    let err = TranslationUnit::parse(&index, Some("t.c"), &["-simulate-crash"], &[], NO_FLAGS)
        .unwrap_err();
    assert!(matches!(err, Error::EngineCrashed), "got {err:?}");
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let ast_path = dir.path().join("unit.ast");
    let ast_path = ast_path.to_str().unwrap();

    let (_engine, index, unit) = parse_source("int x = 1; float y;");
    unit.save(ast_path, NO_FLAGS).unwrap();

    let loaded = TranslationUnit::load(&index, ast_path).unwrap();
    assert_eq!(loaded.spelling(), unit.spelling());
    let names: Vec<String> = loaded.cursor().children().iter().map(|c| c.spelling()).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_save_to_unwritable_path_fails() {
    let (_engine, _index, unit) = parse_source("int x;");
    let err = unit.save("/no/such/dir/unit.ast", NO_FLAGS).unwrap_err();
    assert!(matches!(err, Error::SaveFailed { .. }), "got {err:?}");
}

#[test]
fn test_load_garbage_is_deserialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ast");
    std::fs::write(&path, "definitely not an AST").unwrap();

    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let err = TranslationUnit::load(&index, path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, Error::Deserialization(_)), "got {err:?}");
}

#[test]
fn test_reparse_replaces_ast() {
    let (_engine, _index, unit) = parse_source("int x;");
    assert_eq!(unit.cursor().children().len(), 1);

    let unsaved = [UnsavedFile::new("test.c", "int x; int y;")];
    unit.reparse(&unsaved, NO_FLAGS).unwrap();
    let names: Vec<String> = unit.cursor().children().iter().map(|c| c.spelling()).collect();
    assert_eq!(names, vec!["x", "y"]);
}

#[test]
fn test_suspend_keeps_unit_usable() {
    let (_engine, _index, unit) = parse_source("int x;");
    assert!(unit.suspend());
    assert_eq!(unit.spelling(), "test.c");
}

#[test]
fn test_default_flag_queries_are_symbolic() {
    let engine = StubEngine::new_ref();
    let editing = TranslationUnit::default_editing_flags(&engine);
    assert!(editing.iter().any(|s| s == "precompiled_preamble"));
    assert!(editing.iter().any(|s| s == "cache_completion_results"));

    let (_engine, _index, unit) = parse_source("int x;");
    assert!(unit.default_save_flags().is_empty());
    assert!(unit.default_reparse_flags().is_empty());
}

#[test]
fn test_unresolvable_flag_symbols_are_skipped() {
    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let unsaved = [UnsavedFile::new("test.c", "int x;")];
    // A typo'd flag must not fail the parse, only contribute nothing.
    let unit = TranslationUnit::parse(
        &index,
        Some("test.c"),
        &[],
        &unsaved,
        &["detailed_preprocessing_record", "no_such_flag"],
    )
    .unwrap();
    assert_eq!(unit.cursor().children().len(), 1);
}

#[test]
fn test_unit_file_and_location_lookup() {
    let (_engine, _index, unit) = parse_source("int a;\nint b;");
    let file = unit.file("test.c").unwrap();
    assert_eq!(file.name(), "test.c");
    assert!(file.contents().unwrap().contains("int b;"));
    assert!(unit.file("other.c").is_none());

    let loc = unit.location(&file, 2, 5).unwrap();
    assert_eq!(loc.line(), 2);
    assert_eq!(loc.column(), 5);
    let cursor = unit.cursor_at(loc).unwrap();
    assert_eq!(cursor.spelling(), "b");
}
