//! The foreign-engine boundary.
//!
//! The engine is a black box that performs parsing and analysis; this trait
//! names every operation the handle layer consumes, over opaque raw payloads.
//! A process linking a native C engine implements [`Engine`] over its FFI
//! surface; [`crate::stub::StubEngine`] implements it in memory.
//!
//! The engine is not assumed reentrant-safe across threads, so it is consumed
//! through a single-threaded [`EngineRef`]. Callers needing concurrency must
//! serialize externally.

use std::rc::Rc;

use crate::error::ErrorCode;

mod raw;

pub use raw::{
    RawComment, RawCompletionResults, RawCompletionString, RawCursor, RawDiagnostic,
    RawDiagnosticSet, RawFile, RawIndex, RawLocation, RawModule, RawModuleMap, RawOverlay,
    RawPolicy, RawRange, RawRemapping, RawToken, RawTokenArray, RawType, RawUnit,
};

/// Shared, single-threaded handle to an engine backend.
pub type EngineRef = Rc<dyn Engine>;

/// An in-memory file override: filename plus byte buffer, supplied verbatim
/// to the engine at parse/reparse/completion time.
#[derive(Debug, Clone)]
pub struct UnsavedFile {
    pub filename: String,
    pub contents: String,
}

impl UnsavedFile {
    pub fn new(filename: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            contents: contents.into(),
        }
    }
}

/// Callback signature of the general child visitor: `(cursor, parent)` to an
/// outcome code from the `child_visit_result` vocabulary.
pub type ChildVisitFn<'a> = dyn FnMut(RawCursor, RawCursor) -> u32 + 'a;

/// Callback signature of the field visitor: outcome codes from the
/// `visitor_result` vocabulary.
pub type FieldVisitFn<'a> = dyn FnMut(RawCursor) -> u32 + 'a;

/// Callback signature of the reference finder.
pub type ReferenceVisitFn<'a> = dyn FnMut(RawCursor, RawRange) -> u32 + 'a;

/// Everything the handle layer needs from the foreign engine.
///
/// Disposal functions pair 1:1 with owned handle kinds and must be called
/// exactly once per created object; the safe layer guarantees that through
/// its `Drop` impls. Value records (cursors, types, locations, tokens) have
/// no disposal calls of their own.
#[allow(clippy::too_many_arguments)]
pub trait Engine {
    // --- process-wide ---

    /// Human-readable engine version string. Not stable, not parseable.
    fn version(&self) -> String;

    /// Enable or disable engine crash recovery. A safety net, not a
    /// cancellation mechanism.
    fn toggle_crash_recovery(&self, enabled: bool);

    // --- index ---

    fn create_index(&self, exclude_decls_from_pch: bool, display_diagnostics: bool) -> RawIndex;
    fn dispose_index(&self, index: RawIndex);
    fn index_global_options(&self, index: RawIndex) -> u32;
    fn set_index_global_options(&self, index: RawIndex, mask: u32);
    fn set_index_emission_path(&self, index: RawIndex, path: Option<&str>);

    // --- translation unit ---

    fn parse_unit(
        &self,
        index: RawIndex,
        source_path: Option<&str>,
        args: &[String],
        unsaved: &[UnsavedFile],
        flags: u32,
    ) -> Result<RawUnit, ErrorCode>;
    /// Load a serialized AST produced by [`Engine::save_unit`].
    fn load_unit(&self, index: RawIndex, ast_path: &str) -> Result<RawUnit, ErrorCode>;
    fn dispose_unit(&self, unit: RawUnit);
    fn unit_spelling(&self, unit: RawUnit) -> String;
    fn unit_cursor(&self, unit: RawUnit) -> RawCursor;
    fn reparse_unit(
        &self,
        unit: RawUnit,
        unsaved: &[UnsavedFile],
        flags: u32,
    ) -> Result<(), ErrorCode>;
    /// `Err` carries the engine's save error reason.
    fn save_unit(&self, unit: RawUnit, path: &str, flags: u32) -> Result<(), &'static str>;
    fn suspend_unit(&self, unit: RawUnit) -> bool;
    fn default_editing_flags(&self) -> u32;
    fn default_save_flags(&self, unit: RawUnit) -> u32;
    fn default_reparse_flags(&self, unit: RawUnit) -> u32;
    /// Skipped preprocessor ranges; whole foreign list is copied out and
    /// released before returning.
    fn skipped_ranges(&self, unit: RawUnit, file: Option<RawFile>) -> Vec<RawRange>;

    // --- files and locations ---

    fn file(&self, unit: RawUnit, path: &str) -> RawFile;
    fn file_name(&self, file: RawFile) -> String;
    fn file_contents(&self, unit: RawUnit, file: RawFile) -> Option<String>;
    fn location(&self, unit: RawUnit, file: RawFile, line: u32, column: u32) -> RawLocation;
    /// Expansion location decomposed as `(file, line, column, offset)`.
    fn location_parts(&self, location: RawLocation) -> (RawFile, u32, u32, u32);
    fn range(&self, start: RawLocation, end: RawLocation) -> RawRange;

    // --- cursors ---

    fn cursor_at(&self, unit: RawUnit, location: RawLocation) -> RawCursor;
    fn cursor_kind(&self, cursor: RawCursor) -> u32;
    fn cursor_spelling(&self, cursor: RawCursor) -> String;
    fn cursor_display_name(&self, cursor: RawCursor) -> String;
    fn cursor_usr(&self, cursor: RawCursor) -> String;
    fn cursor_hash(&self, cursor: RawCursor) -> u32;
    fn cursor_eq(&self, a: RawCursor, b: RawCursor) -> bool;
    fn cursor_location(&self, cursor: RawCursor) -> RawLocation;
    fn cursor_extent(&self, cursor: RawCursor) -> RawRange;
    fn cursor_semantic_parent(&self, cursor: RawCursor) -> RawCursor;
    fn cursor_lexical_parent(&self, cursor: RawCursor) -> RawCursor;
    fn cursor_definition(&self, cursor: RawCursor) -> RawCursor;
    fn cursor_referenced(&self, cursor: RawCursor) -> RawCursor;
    fn cursor_type(&self, cursor: RawCursor) -> RawType;
    fn cursor_linkage(&self, cursor: RawCursor) -> u32;
    fn cursor_visibility(&self, cursor: RawCursor) -> u32;
    fn cursor_availability(&self, cursor: RawCursor) -> u32;
    fn cursor_language(&self, cursor: RawCursor) -> u32;
    fn cursor_tls_kind(&self, cursor: RawCursor) -> u32;
    fn cursor_storage_class(&self, cursor: RawCursor) -> u32;

    /// The engine's native depth-first pre-order walk. Returns `true` if the
    /// callback terminated the walk early.
    fn visit_children(&self, root: RawCursor, visitor: &mut ChildVisitFn<'_>) -> bool;
    fn find_references(&self, cursor: RawCursor, file: RawFile, visitor: &mut ReferenceVisitFn<'_>);

    // --- types ---

    fn type_kind(&self, ty: RawType) -> u32;
    fn type_spelling(&self, ty: RawType) -> String;
    fn type_canonical(&self, ty: RawType) -> RawType;
    fn type_pointee(&self, ty: RawType) -> RawType;
    fn type_result(&self, ty: RawType) -> RawType;
    fn type_num_args(&self, ty: RawType) -> i32;
    fn type_arg(&self, ty: RawType, index: u32) -> RawType;
    /// Negative values are the engine's layout error codes.
    fn type_size_of(&self, ty: RawType) -> i64;
    fn type_align_of(&self, ty: RawType) -> i64;
    fn visit_fields(&self, ty: RawType, visitor: &mut FieldVisitFn<'_>) -> bool;

    // --- tokens ---

    /// Tokenize a range. Ownership of the produced array transfers to the
    /// caller, who must release it with [`Engine::dispose_tokens`].
    fn tokenize(&self, unit: RawUnit, range: RawRange) -> RawTokenArray;
    fn dispose_tokens(&self, unit: RawUnit, tokens: RawTokenArray);
    fn token_count(&self, tokens: RawTokenArray) -> u32;
    fn token_at(&self, tokens: RawTokenArray, index: u32) -> RawToken;
    fn token_kind(&self, token: RawToken) -> u32;
    fn token_spelling(&self, unit: RawUnit, token: RawToken) -> String;
    fn token_location(&self, unit: RawUnit, token: RawToken) -> RawLocation;
    fn token_extent(&self, unit: RawUnit, token: RawToken) -> RawRange;
    /// Cursor for each token in the array, value-copied out.
    fn annotate_tokens(&self, unit: RawUnit, tokens: RawTokenArray) -> Vec<RawCursor>;

    // --- diagnostics ---

    fn diagnostic_count(&self, unit: RawUnit) -> u32;
    fn diagnostic(&self, unit: RawUnit, index: u32) -> RawDiagnostic;
    fn dispose_diagnostic(&self, diagnostic: RawDiagnostic);
    fn diagnostic_set_from_unit(&self, unit: RawUnit) -> RawDiagnosticSet;
    fn load_diagnostics(&self, path: &str) -> Result<RawDiagnosticSet, String>;
    fn dispose_diagnostic_set(&self, set: RawDiagnosticSet);
    fn diagnostic_set_count(&self, set: RawDiagnosticSet) -> u32;
    fn diagnostic_in_set(&self, set: RawDiagnosticSet, index: u32) -> RawDiagnostic;
    fn diagnostic_severity(&self, diagnostic: RawDiagnostic) -> u32;
    fn diagnostic_spelling(&self, diagnostic: RawDiagnostic) -> String;
    fn diagnostic_location(&self, diagnostic: RawDiagnostic) -> RawLocation;
    fn diagnostic_format(&self, diagnostic: RawDiagnostic, display_mask: u32) -> String;
    /// Child diagnostics: a non-owned view set that must NOT be disposed.
    fn diagnostic_children(&self, diagnostic: RawDiagnostic) -> RawDiagnosticSet;
    fn default_diagnostic_display_options(&self) -> u32;

    // --- comments ---

    fn cursor_comment_range(&self, cursor: RawCursor) -> RawRange;
    fn cursor_raw_comment_text(&self, cursor: RawCursor) -> String;
    fn cursor_brief_comment_text(&self, cursor: RawCursor) -> String;
    fn cursor_parsed_comment(&self, cursor: RawCursor) -> RawComment;
    fn comment_kind(&self, comment: RawComment) -> u32;
    fn comment_child_count(&self, comment: RawComment) -> u32;
    fn comment_child(&self, comment: RawComment, index: u32) -> RawComment;
    /// Text payload of text-bearing comment nodes; empty otherwise.
    fn comment_text(&self, comment: RawComment) -> String;

    // --- modules ---

    fn cursor_module(&self, cursor: RawCursor) -> RawModule;
    fn module_name(&self, module: RawModule) -> String;
    fn module_full_name(&self, module: RawModule) -> String;
    fn module_top_level_header_count(&self, unit: RawUnit, module: RawModule) -> u32;
    fn module_top_level_header(&self, unit: RawUnit, module: RawModule, index: u32) -> RawFile;

    // --- code completion ---

    fn code_complete_at(
        &self,
        unit: RawUnit,
        path: &str,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
        flags: u32,
    ) -> RawCompletionResults;
    fn dispose_completion_results(&self, results: RawCompletionResults);
    fn completion_result_count(&self, results: RawCompletionResults) -> u32;
    fn completion_result_kind(&self, results: RawCompletionResults, index: u32) -> u32;
    fn completion_result_string(
        &self,
        results: RawCompletionResults,
        index: u32,
    ) -> RawCompletionString;
    fn completion_chunk_count(&self, string: RawCompletionString) -> u32;
    fn completion_chunk_kind(&self, string: RawCompletionString, index: u32) -> u32;
    fn completion_chunk_text(&self, string: RawCompletionString, index: u32) -> String;
    fn default_code_complete_flags(&self) -> u32;

    // --- standalone handles ---

    fn create_overlay(&self, case_sensitive: bool) -> RawOverlay;
    fn overlay_add_mapping(
        &self,
        overlay: RawOverlay,
        virtual_path: &str,
        real_path: &str,
    ) -> Result<(), ErrorCode>;
    fn overlay_write(&self, overlay: RawOverlay) -> Result<Vec<u8>, ErrorCode>;
    fn dispose_overlay(&self, overlay: RawOverlay);

    fn create_module_map(&self, name: &str, umbrella_header: &str)
    -> Result<RawModuleMap, ErrorCode>;
    fn module_map_write(&self, map: RawModuleMap) -> Result<Vec<u8>, ErrorCode>;
    fn dispose_module_map(&self, map: RawModuleMap);

    fn create_remapping(&self, path: &str) -> RawRemapping;
    fn remapping_count(&self, remapping: RawRemapping) -> u32;
    /// `(original, transformed)` path pair, value-copied out.
    fn remapping_entry(&self, remapping: RawRemapping, index: u32) -> (String, String);
    fn dispose_remapping(&self, remapping: RawRemapping);

    fn cursor_printing_policy(&self, cursor: RawCursor) -> RawPolicy;
    fn policy_property(&self, policy: RawPolicy, property: u32) -> u32;
    fn set_policy_property(&self, policy: RawPolicy, property: u32, value: u32);
    fn dispose_policy(&self, policy: RawPolicy);
    fn pretty_print(&self, cursor: RawCursor, policy: RawPolicy) -> String;
}
