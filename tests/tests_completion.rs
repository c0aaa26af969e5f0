#![allow(clippy::unwrap_used)]
use cxlens::{EngineRef, Index, StubEngine, TranslationUnit, UnsavedFile};

const NO_FLAGS: &[&str] = &[];

fn parse_source(source: &str) -> (EngineRef, Index, TranslationUnit) {
    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let unsaved = [UnsavedFile::new("test.c", source)];
    let unit =
        TranslationUnit::parse(&index, Some("test.c"), &[], &unsaved, NO_FLAGS).unwrap();
    (engine, index, unit)
}

const DECLS: &str = "int count; float scale(float value);";

#[test]
fn test_results_cover_visible_declarations() {
    let (_engine, _index, unit) = parse_source(DECLS);
    let results = unit.code_complete("test.c", 1, 1, &[], NO_FLAGS).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.result_kind(0).unwrap(), "var_decl");
    assert_eq!(results.result_kind(1).unwrap(), "function_decl");
    assert!(results.result_kind(2).is_none());
}

#[test]
fn test_typed_text_is_the_insertion() {
    let (_engine, _index, unit) = parse_source(DECLS);
    let results = unit.code_complete("test.c", 1, 1, &[], NO_FLAGS).unwrap();
    let names: Vec<String> = results.iter().map(|s| s.typed_text()).collect();
    assert_eq!(names, vec!["count", "scale"]);
}

#[test]
fn test_function_completion_chunks() {
    let (_engine, _index, unit) = parse_source(DECLS);
    let results = unit.code_complete("test.c", 1, 1, &[], NO_FLAGS).unwrap();
    let scale = results.get(1).unwrap();

    let kinds: Vec<String> = (0..scale.chunk_count())
        .map(|i| scale.chunk_kind(i).unwrap().to_string())
        .collect();
    assert_eq!(
        kinds,
        vec!["result_type", "typed_text", "left_paren", "placeholder", "right_paren"]
    );
    assert_eq!(scale.chunk_text(0).unwrap(), "float");
    assert!(scale.chunk_kind(kinds.len() as u32).is_none());
}

#[test]
fn test_explicit_flags_accepted() {
    let (_engine, _index, unit) = parse_source(DECLS);
    let results = unit
        .code_complete("test.c", 1, 1, &[], &["include_macros", "include_code_patterns"])
        .unwrap();
    assert_eq!(results.len(), 2);
}
