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

#[test]
fn test_primitive_type_and_layout() {
    let (_engine, _index, unit) = parse_source("int x;");
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    assert_eq!(ty.kind(), "int");
    assert_eq!(ty.spelling(), "int");
    assert_eq!(ty.size_of(), Some(4));
    assert_eq!(ty.align_of(), Some(4));
}

#[test]
fn test_pointer_type_and_pointee() {
    let (_engine, _index, unit) = parse_source("char *name;");
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    assert_eq!(ty.kind(), "pointer");
    assert_eq!(ty.size_of(), Some(8));

    let pointee = ty.pointee().unwrap();
    assert_eq!(pointee.kind(), "char_s");
    assert_eq!(pointee.size_of(), Some(1));
    assert!(pointee.pointee().is_none());
}

#[test]
fn test_function_proto_signature() {
    let (_engine, _index, unit) = parse_source("float scale(float value, int factor);");
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    assert_eq!(ty.kind(), "function_proto");
    assert_eq!(ty.result().unwrap().kind(), "float");
    assert_eq!(ty.num_args(), Some(2));
    assert_eq!(ty.arg(0).unwrap().kind(), "float");
    assert_eq!(ty.arg(1).unwrap().kind(), "int");
    assert!(ty.arg(2).is_none());
    // Layout queries are meaningless on function types.
    assert!(ty.size_of().is_none());
}

#[test]
fn test_non_function_has_no_args() {
    let (_engine, _index, unit) = parse_source("int x;");
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    assert!(ty.num_args().is_none());
    assert!(ty.arg(0).is_none());
    assert!(ty.result().is_none());
}

#[test]
fn test_record_layout_and_fields() {
    let (_engine, _index, unit) = parse_source("struct pair { int first; char *second; };");
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    assert_eq!(ty.kind(), "record");
    assert_eq!(ty.spelling(), "struct pair");
    assert_eq!(ty.size_of(), Some(12));
    assert_eq!(ty.align_of(), Some(8));

    let fields = ty.fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].cursor_type().unwrap().kind(), "pointer");
}

#[test]
fn test_incomplete_record_has_no_layout() {
    // `struct widget` is never defined in this unit.
    let (_engine, _index, unit) = parse_source("struct widget w;");
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    assert_eq!(ty.kind(), "record");
    assert!(ty.size_of().is_none());
    assert!(ty.fields().is_empty());
}

#[test]
fn test_canonical_is_identity_for_plain_types() {
    let (_engine, _index, unit) = parse_source("int x;");
    let ty = unit.cursor().children()[0].cursor_type().unwrap();
    assert_eq!(ty.canonical(), ty);
}

#[test]
fn test_cursor_attribute_queries() {
    let (_engine, _index, unit) = parse_source("static int counter; extern float rate;");
    let decls = unit.cursor().children();

    let counter = decls[0];
    assert_eq!(counter.storage_class(), "static");
    assert_eq!(counter.linkage(), "internal");
    assert_eq!(counter.usr(), "c:@counter");

    let rate = decls[1];
    assert_eq!(rate.storage_class(), "extern");
    assert_eq!(rate.linkage(), "external");
    assert_eq!(rate.visibility(), "default");
    assert_eq!(rate.language(), "c");
    assert_eq!(rate.availability(), "available");
    assert_eq!(rate.tls_kind(), "none");
    // Plain C declarations belong to no module.
    assert!(rate.module().is_none());
}

#[test]
fn test_display_name_includes_parameters() {
    let (_engine, _index, unit) = parse_source("float scale(float value, int factor);");
    let scale = unit.cursor().children()[0];
    assert_eq!(scale.spelling(), "scale");
    assert_eq!(scale.display_name(), "scale(float, int)");
}
