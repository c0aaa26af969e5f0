#![allow(clippy::unwrap_used)]
use cxlens::{
    ChildVisit, EngineRef, Index, StubEngine, Traversal, TranslationUnit, UnsavedFile, VisitResult,
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

const NESTED: &str = "struct point { int x; int y; }; int z;";

#[test]
fn test_recurse_walks_preorder() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let mut names = Vec::new();
    let outcome = unit.cursor().visit_children(|cursor, _parent| {
        names.push(cursor.spelling());
        ChildVisit::Recurse
    });
    assert_eq!(outcome, Traversal::Done);
    assert_eq!(names, vec!["point", "x", "y", "z"]);
}

#[test]
fn test_continue_skips_subtrees() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let mut names = Vec::new();
    let outcome = unit.cursor().visit_children(|cursor, _parent| {
        names.push(cursor.spelling());
        ChildVisit::Continue
    });
    assert_eq!(outcome, Traversal::Done);
    assert_eq!(names, vec!["point", "z"]);
}

#[test]
fn test_break_terminates_after_first_node() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let mut count = 0;
    let outcome = unit.cursor().visit_children(|_, _| {
        count += 1;
        ChildVisit::Break
    });
    assert!(outcome.terminated_early());
    assert_eq!(count, 1);
}

#[test]
fn test_break_in_nested_level_unwinds_whole_walk() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let mut names = Vec::new();
    let outcome = unit.cursor().visit_children(|cursor, _parent| {
        let spelling = cursor.spelling();
        names.push(spelling.clone());
        if spelling == "x" {
            ChildVisit::Break
        } else {
            ChildVisit::Recurse
        }
    });
    // Side effects before the break are kept; z is never reached.
    assert_eq!(outcome, Traversal::Terminated);
    assert_eq!(names, vec!["point", "x"]);
}

#[test]
fn test_parent_argument_tracks_nesting() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let mut pairs = Vec::new();
    unit.cursor().visit_children(|cursor, parent| {
        pairs.push((cursor.spelling(), parent.spelling()));
        ChildVisit::Recurse
    });
    assert!(pairs.contains(&("x".to_string(), "point".to_string())));
    assert!(pairs.contains(&("z".to_string(), String::new())));
}

#[test]
fn test_visit_fields_in_declaration_order() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let record = unit.cursor().children()[0];
    let ty = record.cursor_type().unwrap();
    let mut fields = Vec::new();
    let outcome = ty.visit_fields(|field| {
        fields.push(field.spelling());
        VisitResult::Continue
    });
    assert_eq!(outcome, Traversal::Done);
    assert_eq!(fields, vec!["x", "y"]);
}

#[test]
fn test_visit_fields_break_stops() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    let mut fields = Vec::new();
    let outcome = ty.visit_fields(|field| {
        fields.push(field.spelling());
        VisitResult::Break
    });
    assert_eq!(outcome, Traversal::Terminated);
    assert_eq!(fields, vec!["x"]);
}

#[test]
fn test_find_references_by_name() {
    let (_engine, _index, unit) = parse_source("int x = 1; int y;");
    let x = unit.cursor().children()[0];
    let file = unit.file("test.c").unwrap();
    let mut seen = Vec::new();
    x.find_references(&file, |cursor, _range| {
        seen.push(cursor.spelling());
        VisitResult::Continue
    });
    assert_eq!(seen, vec!["x"]);
}

#[test]
fn test_semantic_parent_and_definition() {
    let (_engine, _index, unit) = parse_source(NESTED);
    let record = unit.cursor().children()[0];
    let field = record.children()[0];
    assert_eq!(field.semantic_parent().unwrap(), record);
    // Declarations are their own definition.
    assert_eq!(field.definition().unwrap(), field);
}
