#![allow(clippy::unwrap_used)]
use cxlens::{EngineRef, Index, StubEngine, TranslationUnit, UnsavedFile};
use rstest::rstest;

const NO_FLAGS: &[&str] = &[];

fn parse_source(source: &str) -> (EngineRef, Index, TranslationUnit) {
    let engine = StubEngine::new_ref();
    let index = Index::new(&engine, false, false);
    let unsaved = [UnsavedFile::new("test.c", source)];
    let unit =
        TranslationUnit::parse(&index, Some("test.c"), &[], &unsaved, NO_FLAGS).unwrap();
    (engine, index, unit)
}

#[rstest]
#[case(0, "int", "keyword")]
#[case(1, "x", "identifier")]
#[case(2, "=", "punctuation")]
#[case(3, "1", "literal")]
#[case(4, ";", "punctuation")]
fn test_token_kind_and_spelling(
    #[case] index: u32,
    #[case] spelling: &str,
    #[case] kind: &str,
) {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    let tokens = unit.tokenize(unit.cursor().extent());
    let token = tokens.get(index).unwrap();
    assert_eq!(token.spelling(), spelling);
    assert_eq!(token.kind(), kind);
}

#[test]
fn test_out_of_range_token_is_none() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    let tokens = unit.tokenize(unit.cursor().extent());
    assert_eq!(tokens.len(), 5);
    assert!(tokens.get(5).is_none());
}

#[test]
fn test_token_location_and_extent() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    let tokens = unit.tokenize(unit.cursor().extent());
    let literal = tokens.get(3).unwrap();
    let loc = literal.location();
    assert_eq!(loc.line(), 1);
    assert_eq!(loc.column(), 9);
    let extent = literal.extent();
    assert_eq!(extent.start().offset(), 8);
    assert_eq!(extent.end().offset(), 9);
}

#[test]
fn test_iter_visits_all_tokens() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    let tokens = unit.tokenize(unit.cursor().extent());
    let spellings: Vec<String> = tokens.iter().map(|t| t.spelling()).collect();
    assert_eq!(spellings, vec!["int", "x", "=", "1", ";"]);
}

#[test]
fn test_annotate_maps_tokens_to_cursors() {
    let (_engine, _index, unit) = parse_source("int x = 1;");
    let tokens = unit.tokenize(unit.cursor().extent());
    let cursors = tokens.annotate();
    assert_eq!(cursors.len() as u32, tokens.len());

    let var = cursors[1].unwrap();
    assert_eq!(var.kind(), "var_decl");
    assert_eq!(var.spelling(), "x");

    let literal = cursors[3].unwrap();
    assert_eq!(literal.kind(), "integer_literal");
}

#[test]
fn test_comment_token_kind() {
    let (_engine, _index, unit) = parse_source("int x; // trailing");
    let tokens = unit.tokenize(unit.cursor().extent());
    let last = tokens.get(tokens.len() - 1).unwrap();
    assert_eq!(last.kind(), "comment");
    assert_eq!(last.spelling(), "// trailing");
}
