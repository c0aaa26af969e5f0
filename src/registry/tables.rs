//! Static vocabularies, one per foreign enumeration.
//!
//! Codes mirror the engine's C enumerations. Tables cover the core of each
//! vocabulary; codes introduced upstream after this layer was built surface
//! as raw numbers through [`EnumTable::symbol`](super::EnumTable::symbol).

use super::EnumTable;
use once_cell::sync::Lazy;

pub static AVAILABILITY_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "availability_kind",
        &[
            ("available", 0),
            ("deprecated", 1),
            ("not_available", 2),
            ("not_accessible", 3),
        ],
    )
});

pub static GLOBAL_OPT_FLAGS: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "global_opt_flags",
        &[
            ("none", 0),
            ("thread_background_priority_for_indexing", 1),
            ("thread_background_priority_for_editing", 2),
            ("thread_background_priority_for_all", 3),
        ],
    )
});

pub static DIAGNOSTIC_SEVERITY: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "diagnostic_severity",
        &[
            ("ignored", 0),
            ("note", 1),
            ("warning", 2),
            ("error", 3),
            ("fatal", 4),
        ],
    )
});

pub static DIAGNOSTIC_DISPLAY_OPTIONS: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "diagnostic_display_options",
        &[
            ("display_source_location", 1),
            ("display_column", 2),
            ("display_source_ranges", 4),
            ("display_option", 8),
            ("display_category_id", 16),
            ("display_category_name", 32),
        ],
    )
});

pub static TRANSLATION_UNIT_FLAGS: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "translation_unit_flags",
        &[
            ("none", 0),
            ("detailed_preprocessing_record", 0x01),
            ("incomplete", 0x02),
            ("precompiled_preamble", 0x04),
            ("cache_completion_results", 0x08),
            ("for_serialization", 0x10),
            ("cxx_chained_pch", 0x20),
            ("skip_function_bodies", 0x40),
            ("include_brief_comments_in_code_completion", 0x80),
            ("create_preamble_on_first_parse", 0x100),
            ("keep_going", 0x200),
            ("single_file_parse", 0x400),
            ("limit_skip_function_bodies_to_preamble", 0x800),
            ("include_attributed_types", 0x1000),
            ("visit_implicit_attributes", 0x2000),
            ("ignore_non_errors_from_included_files", 0x4000),
            ("retain_excluded_conditional_blocks", 0x8000),
        ],
    )
});

pub static SAVE_TRANSLATION_UNIT_FLAGS: Lazy<EnumTable> =
    Lazy::new(|| EnumTable::new("save_translation_unit_flags", &[("none", 0)]));

pub static REPARSE_FLAGS: Lazy<EnumTable> =
    Lazy::new(|| EnumTable::new("reparse_flags", &[("none", 0)]));

pub static CURSOR_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "cursor_kind",
        &[
            // Declarations
            ("unexposed_decl", 1),
            ("struct_decl", 2),
            ("union_decl", 3),
            ("class_decl", 4),
            ("enum_decl", 5),
            ("field_decl", 6),
            ("enum_constant_decl", 7),
            ("function_decl", 8),
            ("var_decl", 9),
            ("parm_decl", 10),
            ("typedef_decl", 20),
            ("cxx_method", 21),
            ("namespace", 22),
            ("linkage_spec", 23),
            ("constructor", 24),
            ("destructor", 25),
            ("conversion_function", 26),
            ("template_type_parameter", 27),
            ("non_type_template_parameter", 28),
            ("function_template", 30),
            ("class_template", 31),
            ("namespace_alias", 33),
            ("using_directive", 34),
            ("using_declaration", 35),
            ("type_alias_decl", 36),
            ("cxx_access_specifier", 39),
            // References
            ("type_ref", 43),
            ("cxx_base_specifier", 44),
            ("template_ref", 45),
            ("namespace_ref", 46),
            ("member_ref", 47),
            ("label_ref", 48),
            ("overloaded_decl_ref", 49),
            ("variable_ref", 50),
            // Invalid
            ("invalid_file", 70),
            ("no_decl_found", 71),
            ("not_implemented", 72),
            ("invalid_code", 73),
            // Expressions
            ("unexposed_expr", 100),
            ("decl_ref_expr", 101),
            ("member_ref_expr", 102),
            ("call_expr", 103),
            ("block_expr", 105),
            ("integer_literal", 106),
            ("floating_literal", 107),
            ("imaginary_literal", 108),
            ("string_literal", 109),
            ("character_literal", 110),
            ("paren_expr", 111),
            ("unary_operator", 112),
            ("array_subscript_expr", 113),
            ("binary_operator", 114),
            ("compound_assign_operator", 115),
            ("conditional_operator", 116),
            ("c_style_cast_expr", 117),
            ("compound_literal_expr", 118),
            ("init_list_expr", 119),
            ("stmt_expr", 121),
            ("cxx_bool_literal_expr", 130),
            ("cxx_null_ptr_literal_expr", 131),
            ("cxx_this_expr", 132),
            ("cxx_throw_expr", 133),
            ("cxx_new_expr", 134),
            ("cxx_delete_expr", 135),
            ("unary_expr", 136),
            ("lambda_expr", 144),
            // Statements
            ("unexposed_stmt", 200),
            ("label_stmt", 201),
            ("compound_stmt", 202),
            ("case_stmt", 203),
            ("default_stmt", 204),
            ("if_stmt", 205),
            ("switch_stmt", 206),
            ("while_stmt", 207),
            ("do_stmt", 208),
            ("for_stmt", 209),
            ("goto_stmt", 210),
            ("indirect_goto_stmt", 211),
            ("continue_stmt", 212),
            ("break_stmt", 213),
            ("return_stmt", 214),
            ("null_stmt", 230),
            ("decl_stmt", 231),
            ("translation_unit", 300),
            // Attributes
            ("unexposed_attr", 400),
            ("annotate_attr", 406),
            ("asm_label_attr", 407),
            ("packed_attr", 408),
            ("pure_attr", 409),
            ("const_attr", 410),
            ("visibility_attr", 417),
            ("warn_unused_attr", 439),
            ("warn_unused_result_attr", 440),
            ("aligned_attr", 441),
            // Preprocessing
            ("preprocessing_directive", 500),
            ("macro_definition", 501),
            ("macro_expansion", 502),
            ("inclusion_directive", 503),
            // Extra declarations
            ("module_import_decl", 600),
            ("type_alias_template_decl", 601),
            ("static_assert", 602),
            ("friend_decl", 603),
            ("overload_candidate", 700),
        ],
    )
});

pub static LINKAGE_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "linkage_kind",
        &[
            ("invalid", 0),
            ("no_linkage", 1),
            ("internal", 2),
            ("unique_external", 3),
            ("external", 4),
        ],
    )
});

pub static VISIBILITY_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "visibility_kind",
        &[
            ("invalid", 0),
            ("hidden", 1),
            ("protected", 2),
            ("default", 3),
        ],
    )
});

pub static LANGUAGE_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "language_kind",
        &[("invalid", 0), ("c", 1), ("obj_c", 2), ("c_plus_plus", 3)],
    )
});

pub static TLS_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new("tls_kind", &[("none", 0), ("dynamic", 1), ("static", 2)])
});

pub static TYPE_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "type_kind",
        &[
            ("invalid", 0),
            ("unexposed", 1),
            ("void", 2),
            ("bool", 3),
            ("char_u", 4),
            ("u_char", 5),
            ("char16", 6),
            ("char32", 7),
            ("u_short", 8),
            ("u_int", 9),
            ("u_long", 10),
            ("u_long_long", 11),
            ("char_s", 13),
            ("s_char", 14),
            ("w_char", 15),
            ("short", 16),
            ("int", 17),
            ("long", 18),
            ("long_long", 19),
            ("float", 21),
            ("double", 22),
            ("long_double", 23),
            ("null_ptr", 24),
            ("overload", 25),
            ("dependent", 26),
            ("complex", 100),
            ("pointer", 101),
            ("block_pointer", 102),
            ("l_value_reference", 103),
            ("r_value_reference", 104),
            ("record", 105),
            ("enum", 106),
            ("typedef", 107),
            ("function_no_proto", 110),
            ("function_proto", 111),
            ("constant_array", 112),
            ("vector", 113),
            ("incomplete_array", 114),
            ("variable_array", 115),
            ("dependent_sized_array", 116),
            ("member_pointer", 117),
            ("auto", 118),
            ("elaborated", 119),
        ],
    )
});

pub static STORAGE_CLASS: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "storage_class",
        &[
            ("invalid", 0),
            ("none", 1),
            ("extern", 2),
            ("static", 3),
            ("private_extern", 4),
            ("auto", 6),
            ("register", 7),
        ],
    )
});

pub static CXX_ACCESS_SPECIFIER: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "cxx_access_specifier",
        &[
            ("invalid", 0),
            ("public", 1),
            ("protected", 2),
            ("private", 3),
        ],
    )
});

pub static TOKEN_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "token_kind",
        &[
            ("punctuation", 0),
            ("keyword", 1),
            ("identifier", 2),
            ("literal", 3),
            ("comment", 4),
        ],
    )
});

pub static COMMENT_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "comment_kind",
        &[
            ("null", 0),
            ("text", 1),
            ("inline_command", 2),
            ("html_start_tag", 3),
            ("html_end_tag", 4),
            ("paragraph", 5),
            ("block_command", 6),
            ("param_command", 7),
            ("tparam_command", 8),
            ("verbatim_block_command", 9),
            ("verbatim_block_line", 10),
            ("verbatim_line", 11),
            ("full_comment", 12),
        ],
    )
});

pub static COMPLETION_CHUNK_KIND: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "completion_chunk_kind",
        &[
            ("optional", 0),
            ("typed_text", 1),
            ("text", 2),
            ("placeholder", 3),
            ("informative", 4),
            ("current_parameter", 5),
            ("left_paren", 6),
            ("right_paren", 7),
            ("comma", 14),
            ("result_type", 15),
            ("colon", 16),
            ("semi_colon", 17),
            ("equal", 18),
            ("horizontal_space", 19),
            ("vertical_space", 20),
        ],
    )
});

pub static CODE_COMPLETE_FLAGS: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "code_complete_flags",
        &[
            ("include_macros", 1),
            ("include_code_patterns", 2),
            ("include_brief_comments", 4),
            ("skip_preamble", 8),
            ("include_completions_with_fixits", 16),
        ],
    )
});

pub static PRINTING_POLICY_PROPERTY: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "printing_policy_property",
        &[
            ("indentation", 0),
            ("suppress_specifiers", 1),
            ("suppress_tag_keyword", 2),
            ("include_tag_definition", 3),
            ("suppress_scope", 4),
            ("suppress_unwritten_scope", 5),
            ("suppress_initializers", 6),
            ("constant_array_size_as_written", 7),
            ("anonymous_tag_locations", 8),
            ("bool", 12),
            ("restrict", 13),
            ("use_void_for_zero_params", 16),
            ("terse_output", 17),
            ("polish_for_declaration", 18),
            ("include_newlines", 21),
            ("constants_as_written", 23),
            ("fully_qualified_name", 25),
        ],
    )
});

/// Three-way outcome vocabulary of the general child visitor.
pub static CHILD_VISIT_RESULT: Lazy<EnumTable> = Lazy::new(|| {
    EnumTable::new(
        "child_visit_result",
        &[("break", 0), ("continue", 1), ("recurse", 2)],
    )
});

/// Two-way outcome vocabulary of the field and reference visitors.
pub static VISITOR_RESULT: Lazy<EnumTable> =
    Lazy::new(|| EnumTable::new("visitor_result", &[("break", 0), ("continue", 1)]));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_round_trip() {
        // Shared codes (e.g. convenience aliases) resolve to the first
        // registered symbol, so only assert on first-of-code entries.
        for table in [
            &*AVAILABILITY_KIND,
            &*GLOBAL_OPT_FLAGS,
            &*DIAGNOSTIC_SEVERITY,
            &*DIAGNOSTIC_DISPLAY_OPTIONS,
            &*TRANSLATION_UNIT_FLAGS,
            &*CURSOR_KIND,
            &*LINKAGE_KIND,
            &*VISIBILITY_KIND,
            &*LANGUAGE_KIND,
            &*TLS_KIND,
            &*TYPE_KIND,
            &*STORAGE_CLASS,
            &*CXX_ACCESS_SPECIFIER,
            &*TOKEN_KIND,
            &*COMMENT_KIND,
            &*COMPLETION_CHUNK_KIND,
            &*CODE_COMPLETE_FLAGS,
            &*PRINTING_POLICY_PROPERTY,
            &*CHILD_VISIT_RESULT,
            &*VISITOR_RESULT,
        ] {
            let mut seen = std::collections::HashSet::new();
            for (name, code) in table.iter() {
                if seen.insert(code) {
                    assert_eq!(
                        table.symbol(code),
                        name,
                        "round trip failed in {}",
                        table.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_display_options_mask() {
        let t = &*DIAGNOSTIC_DISPLAY_OPTIONS;
        let m = t.mask(["display_source_location", "display_column"]);
        assert_eq!(m, 1 | 2);
        assert_eq!(t.unmask(m), vec!["display_source_location", "display_column"]);
    }

    #[test]
    fn test_var_decl_code() {
        assert_eq!(CURSOR_KIND.code("var_decl"), 9);
        assert_eq!(CURSOR_KIND.symbol(9), "var_decl");
    }
}
