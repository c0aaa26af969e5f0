//! In-memory [`Engine`] backend.
//!
//! `StubEngine` stands in for a native analysis library: it recognizes a
//! small C-flavoured declaration language, keeps every object in a
//! `RefCell`-guarded arena keyed by minted ids, and enforces the foreign
//! API's ownership contract the hard way. Disposing an object twice, or
//! using it after disposal, is a bug in the handle layer and panics here
//! rather than corrupting state.
//!
//! Serialized units and diagnostic files are plain JSON, so save/load round
//! trips work without any native library present.

use std::cell::RefCell;
use std::fs;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::trace;

use crate::engine::{
    ChildVisitFn, Engine, EngineRef, FieldVisitFn, RawComment, RawCompletionResults,
    RawCompletionString, RawCursor, RawDiagnostic, RawDiagnosticSet, RawFile, RawIndex,
    RawLocation, RawModule, RawModuleMap, RawOverlay, RawPolicy, RawRange, RawRemapping, RawToken,
    RawTokenArray, RawType, RawUnit, ReferenceVisitFn, UnsavedFile,
};
use crate::error::ErrorCode;

mod ast;
mod lexer;

use ast::{DiagData, SourceModel, comment_kind, kind, storage, type_kind};
use lexer::{Lexeme, lex, line_col};

struct IndexData {
    #[allow(dead_code)]
    exclude_decls_from_pch: bool,
    #[allow(dead_code)]
    display_diagnostics: bool,
    options: u32,
    #[allow(dead_code)]
    emission_path: Option<String>,
}

struct FileData {
    name: String,
    contents: String,
}

struct UnitData {
    spelling: String,
    model: SourceModel,
    main_file: u64,
    files: Vec<u64>,
}

struct DiagHandle {
    data: DiagData,
    file: Option<u64>,
}

struct DiagSetData {
    diags: Vec<DiagData>,
    file: Option<u64>,
    owned: bool,
}

struct TokenArrayData {
    file: u64,
    toks: Vec<Lexeme>,
}

struct CompletionItem {
    kind: u32,
    chunks: Vec<(u32, String)>,
}

struct CompletionData {
    results: Vec<CompletionItem>,
}

struct OverlayData {
    case_sensitive: bool,
    mappings: Vec<(String, String)>,
}

struct ModuleMapData {
    name: String,
    umbrella: String,
}

#[derive(Serialize, Deserialize)]
struct SavedFile {
    name: String,
    contents: String,
}

#[derive(Serialize, Deserialize)]
struct SavedUnit {
    spelling: String,
    model: SourceModel,
    files: Vec<SavedFile>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    crash_recovery: bool,
    indexes: FxHashMap<u64, IndexData>,
    units: FxHashMap<u64, UnitData>,
    files: FxHashMap<u64, FileData>,
    diags: FxHashMap<u64, DiagHandle>,
    diag_sets: FxHashMap<u64, DiagSetData>,
    token_arrays: FxHashMap<u64, TokenArrayData>,
    completions: FxHashMap<u64, CompletionData>,
    overlays: FxHashMap<u64, OverlayData>,
    module_maps: FxHashMap<u64, ModuleMapData>,
    remappings: FxHashMap<u64, Vec<(String, String)>>,
    policies: FxHashMap<u64, FxHashMap<u32, u32>>,
}

impl State {
    fn mint(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn index(&self, id: u64) -> &IndexData {
        self.indexes
            .get(&id)
            .unwrap_or_else(|| panic!("stub: unknown or disposed index {id}"))
    }

    fn unit(&self, id: u64) -> &UnitData {
        self.units
            .get(&id)
            .unwrap_or_else(|| panic!("stub: unknown or disposed translation unit {id}"))
    }

    fn file(&self, id: u64) -> &FileData {
        self.files
            .get(&id)
            .unwrap_or_else(|| panic!("stub: unknown file {id}"))
    }

    fn diag(&self, id: u64) -> &DiagHandle {
        self.diags
            .get(&id)
            .unwrap_or_else(|| panic!("stub: unknown or disposed diagnostic {id}"))
    }

    fn diag_set(&self, id: u64) -> &DiagSetData {
        self.diag_sets
            .get(&id)
            .unwrap_or_else(|| panic!("stub: unknown or disposed diagnostic set {id}"))
    }

    fn tokens(&self, id: u64) -> &TokenArrayData {
        self.token_arrays
            .get(&id)
            .unwrap_or_else(|| panic!("stub: unknown or disposed token array {id}"))
    }

    fn completion(&self, id: u64) -> &CompletionData {
        self.completions
            .get(&id)
            .unwrap_or_else(|| panic!("stub: unknown or disposed completion results {id}"))
    }
}

fn cursor_raw(unit: u64, node: usize, kind_code: u32) -> RawCursor {
    RawCursor {
        kind: kind_code,
        data: [unit, node as u64 + 1, 0],
    }
}

fn decode_cursor(cursor: RawCursor) -> Option<(u64, usize)> {
    if cursor.data[1] == 0 {
        None
    } else {
        Some((cursor.data[0], (cursor.data[1] - 1) as usize))
    }
}

fn type_raw(unit: u64, index: usize, kind_code: u32) -> RawType {
    RawType {
        kind: kind_code,
        data: [unit, index as u64 + 1],
    }
}

fn decode_type(ty: RawType) -> Option<(u64, usize)> {
    if ty.data[1] == 0 {
        None
    } else {
        Some((ty.data[0], (ty.data[1] - 1) as usize))
    }
}

fn decode_comment(comment: RawComment) -> Option<(u64, usize)> {
    if comment.data[1] == 0 {
        None
    } else {
        Some((comment.data[0], (comment.data[1] - 1) as usize))
    }
}

fn make_location(file: u64, text: &str, offset: usize) -> RawLocation {
    let (line, col) = line_col(text, offset);
    RawLocation {
        data: [file, (u64::from(line) << 32) | u64::from(col), offset as u64],
    }
}

fn offset_of(text: &str, line: u32, column: u32) -> usize {
    let mut remaining = line.saturating_sub(1);
    let mut off = 0;
    for l in text.split_inclusive('\n') {
        if remaining == 0 {
            return (off + column.saturating_sub(1) as usize).min(off + l.len());
        }
        off += l.len();
        remaining -= 1;
    }
    text.len()
}

fn deepest_at(model: &SourceModel, offset: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, n) in model.nodes.iter().enumerate().skip(1) {
        if n.start <= offset && offset < n.end {
            let narrower = match best {
                Some(b) => (n.end - n.start) < (model.nodes[b].end - model.nodes[b].start),
                None => true,
            };
            if narrower {
                best = Some(i);
            }
        }
    }
    best
}

fn severity_name(code: u32) -> &'static str {
    match code {
        0 => "ignored",
        1 => "note",
        2 => "warning",
        3 => "error",
        4 => "fatal",
        _ => "unknown",
    }
}

fn is_decl(kind_code: u32) -> bool {
    matches!(
        kind_code,
        kind::STRUCT_DECL
            | kind::FIELD_DECL
            | kind::FUNCTION_DECL
            | kind::VAR_DECL
            | kind::PARM_DECL
            | kind::TYPEDEF_DECL
    )
}

/// An engine that needs no native library. See the module docs.
#[derive(Default)]
pub struct StubEngine {
    state: RefCell<State>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh engine behind the shared handle the safe layer consumes.
    pub fn new_ref() -> EngineRef {
        Rc::new(Self::new())
    }

    fn walk(
        &self,
        unit_id: u64,
        node: usize,
        parent: RawCursor,
        visitor: &mut ChildVisitFn<'_>,
    ) -> bool {
        // Snapshot before calling out: the callback may re-enter the engine.
        let children: Vec<(usize, RawCursor)> = {
            let state = self.state.borrow();
            let unit = state.unit(unit_id);
            unit.model.nodes[node]
                .children
                .iter()
                .map(|c| (*c, cursor_raw(unit_id, *c, unit.model.nodes[*c].kind)))
                .collect()
        };
        for (child, raw) in children {
            match visitor(raw, parent) {
                2 => {
                    if self.walk(unit_id, child, raw, visitor) {
                        return true;
                    }
                }
                1 => {}
                // Break, and any code outside the vocabulary.
                _ => return true,
            }
        }
        false
    }

    fn node_range(&self, unit_id: u64, node: usize) -> RawRange {
        let state = self.state.borrow();
        let unit = state.unit(unit_id);
        let file = unit.main_file;
        let text = &state.file(file).contents;
        let n = &unit.model.nodes[node];
        RawRange {
            start: make_location(file, text, n.start),
            end: make_location(file, text, n.end),
        }
    }

    fn read_source(
        path: &str,
        unsaved: &[UnsavedFile],
    ) -> std::result::Result<String, ErrorCode> {
        if let Some(u) = unsaved.iter().find(|u| u.filename == path) {
            return Ok(u.contents.clone());
        }
        fs::read_to_string(path).map_err(|_| ErrorCode::Failure)
    }
}

impl Engine for StubEngine {
    fn version(&self) -> String {
        format!("cxlens stub engine {}", env!("CARGO_PKG_VERSION"))
    }

    fn toggle_crash_recovery(&self, enabled: bool) {
        self.state.borrow_mut().crash_recovery = enabled;
    }

    // --- index ---

    fn create_index(&self, exclude_decls_from_pch: bool, display_diagnostics: bool) -> RawIndex {
        let mut state = self.state.borrow_mut();
        let id = state.mint();
        state.indexes.insert(
            id,
            IndexData {
                exclude_decls_from_pch,
                display_diagnostics,
                options: 0,
                emission_path: None,
            },
        );
        trace!(index = id, "stub created index");
        RawIndex(id)
    }

    fn dispose_index(&self, index: RawIndex) {
        if self.state.borrow_mut().indexes.remove(&index.0).is_none() {
            panic!("stub: double dispose of index {}", index.0);
        }
    }

    fn index_global_options(&self, index: RawIndex) -> u32 {
        self.state.borrow().index(index.0).options
    }

    fn set_index_global_options(&self, index: RawIndex, mask: u32) {
        let mut state = self.state.borrow_mut();
        state.index(index.0);
        if let Some(data) = state.indexes.get_mut(&index.0) {
            data.options = mask;
        }
    }

    fn set_index_emission_path(&self, index: RawIndex, path: Option<&str>) {
        let mut state = self.state.borrow_mut();
        state.index(index.0);
        if let Some(data) = state.indexes.get_mut(&index.0) {
            data.emission_path = path.map(str::to_owned);
        }
    }

    // --- translation unit ---

    fn parse_unit(
        &self,
        index: RawIndex,
        source_path: Option<&str>,
        args: &[String],
        unsaved: &[UnsavedFile],
        _flags: u32,
    ) -> std::result::Result<RawUnit, ErrorCode> {
        self.state.borrow().index(index.0);
        if args.iter().any(|a| a == "-simulate-crash") {
            // With recovery on, a crash surfaces as an error code; without
            // it, the engine takes the process down, which here is a panic.
            if self.state.borrow().crash_recovery {
                return Err(ErrorCode::Crashed);
            }
            panic!("stub: engine crashed with crash recovery disabled");
        }
        let path = match source_path {
            Some(p) => p.to_string(),
            None => args
                .iter()
                .find(|a| !a.starts_with('-'))
                .cloned()
                .ok_or(ErrorCode::InvalidArguments)?,
        };
        let text = Self::read_source(&path, unsaved)?;
        let model = ast::analyze(&text);

        let mut state = self.state.borrow_mut();
        let file_id = state.mint();
        state.files.insert(
            file_id,
            FileData {
                name: path.clone(),
                contents: text,
            },
        );
        let unit_id = state.mint();
        state.units.insert(
            unit_id,
            UnitData {
                spelling: path,
                model,
                main_file: file_id,
                files: vec![file_id],
            },
        );
        trace!(unit = unit_id, "stub parsed unit");
        Ok(RawUnit(unit_id))
    }

    fn load_unit(&self, index: RawIndex, ast_path: &str) -> std::result::Result<RawUnit, ErrorCode> {
        self.state.borrow().index(index.0);
        let text = fs::read_to_string(ast_path).map_err(|_| ErrorCode::AstReadError)?;
        let saved: SavedUnit =
            serde_json::from_str(&text).map_err(|_| ErrorCode::AstReadError)?;

        let mut state = self.state.borrow_mut();
        let mut files = Vec::with_capacity(saved.files.len());
        for f in saved.files {
            let id = state.mint();
            state.files.insert(
                id,
                FileData {
                    name: f.name,
                    contents: f.contents,
                },
            );
            files.push(id);
        }
        let main_file = files.first().copied().ok_or(ErrorCode::AstReadError)?;
        let unit_id = state.mint();
        state.units.insert(
            unit_id,
            UnitData {
                spelling: saved.spelling,
                model: saved.model,
                main_file,
                files,
            },
        );
        Ok(RawUnit(unit_id))
    }

    fn dispose_unit(&self, unit: RawUnit) {
        let mut state = self.state.borrow_mut();
        let Some(data) = state.units.remove(&unit.0) else {
            panic!("stub: double dispose of translation unit {}", unit.0);
        };
        for f in data.files {
            state.files.remove(&f);
        }
    }

    fn unit_spelling(&self, unit: RawUnit) -> String {
        self.state.borrow().unit(unit.0).spelling.clone()
    }

    fn unit_cursor(&self, unit: RawUnit) -> RawCursor {
        self.state.borrow().unit(unit.0);
        cursor_raw(unit.0, SourceModel::ROOT, kind::TRANSLATION_UNIT)
    }

    fn reparse_unit(
        &self,
        unit: RawUnit,
        unsaved: &[UnsavedFile],
        _flags: u32,
    ) -> std::result::Result<(), ErrorCode> {
        let path = self.state.borrow().unit(unit.0).spelling.clone();
        let text = Self::read_source(&path, unsaved).map_err(|_| ErrorCode::InvalidArguments)?;
        let model = ast::analyze(&text);
        let mut state = self.state.borrow_mut();
        let main = state.unit(unit.0).main_file;
        if let Some(f) = state.files.get_mut(&main) {
            f.contents = text;
        }
        if let Some(u) = state.units.get_mut(&unit.0) {
            u.model = model;
        }
        Ok(())
    }

    fn save_unit(
        &self,
        unit: RawUnit,
        path: &str,
        _flags: u32,
    ) -> std::result::Result<(), &'static str> {
        let saved = {
            let state = self.state.borrow();
            let data = state.unit(unit.0);
            SavedUnit {
                spelling: data.spelling.clone(),
                model: data.model.clone(),
                files: data
                    .files
                    .iter()
                    .map(|f| {
                        let file = state.file(*f);
                        SavedFile {
                            name: file.name.clone(),
                            contents: file.contents.clone(),
                        }
                    })
                    .collect(),
            }
        };
        let json =
            serde_json::to_string_pretty(&saved).map_err(|_| "cannot serialize translation unit")?;
        fs::write(path, json).map_err(|_| "unknown error")
    }

    fn suspend_unit(&self, unit: RawUnit) -> bool {
        self.state.borrow().unit(unit.0);
        true
    }

    fn default_editing_flags(&self) -> u32 {
        // precompiled_preamble | cache_completion_results
        0x04 | 0x08
    }

    fn default_save_flags(&self, unit: RawUnit) -> u32 {
        self.state.borrow().unit(unit.0);
        0
    }

    fn default_reparse_flags(&self, unit: RawUnit) -> u32 {
        self.state.borrow().unit(unit.0);
        0
    }

    fn skipped_ranges(&self, unit: RawUnit, _file: Option<RawFile>) -> Vec<RawRange> {
        self.state.borrow().unit(unit.0);
        Vec::new()
    }

    // --- files and locations ---

    fn file(&self, unit: RawUnit, path: &str) -> RawFile {
        let state = self.state.borrow();
        let data = state.unit(unit.0);
        data.files
            .iter()
            .find(|f| state.file(**f).name == path)
            .map(|f| RawFile(*f))
            .unwrap_or(RawFile::NULL)
    }

    fn file_name(&self, file: RawFile) -> String {
        self.state.borrow().file(file.0).name.clone()
    }

    fn file_contents(&self, unit: RawUnit, file: RawFile) -> Option<String> {
        let state = self.state.borrow();
        state.unit(unit.0);
        state.files.get(&file.0).map(|f| f.contents.clone())
    }

    fn location(&self, unit: RawUnit, file: RawFile, line: u32, column: u32) -> RawLocation {
        let state = self.state.borrow();
        state.unit(unit.0);
        let text = &state.file(file.0).contents;
        make_location(file.0, text, offset_of(text, line, column))
    }

    fn location_parts(&self, location: RawLocation) -> (RawFile, u32, u32, u32) {
        let packed = location.data[1];
        (
            RawFile(location.data[0]),
            (packed >> 32) as u32,
            (packed & 0xffff_ffff) as u32,
            location.data[2] as u32,
        )
    }

    fn range(&self, start: RawLocation, end: RawLocation) -> RawRange {
        RawRange { start, end }
    }

    // --- cursors ---

    fn cursor_at(&self, unit: RawUnit, location: RawLocation) -> RawCursor {
        let state = self.state.borrow();
        let data = state.unit(unit.0);
        let offset = location.data[2] as usize;
        match deepest_at(&data.model, offset) {
            Some(n) => cursor_raw(unit.0, n, data.model.nodes[n].kind),
            None => cursor_raw(unit.0, SourceModel::ROOT, kind::TRANSLATION_UNIT),
        }
    }

    fn cursor_kind(&self, cursor: RawCursor) -> u32 {
        cursor.kind
    }

    fn cursor_spelling(&self, cursor: RawCursor) -> String {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return String::new();
        };
        let state = self.state.borrow();
        state.unit(unit).model.nodes[node].spelling.clone()
    }

    fn cursor_display_name(&self, cursor: RawCursor) -> String {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return String::new();
        };
        let state = self.state.borrow();
        let model = &state.unit(unit).model;
        let n = &model.nodes[node];
        if n.kind == kind::FUNCTION_DECL {
            if let Some(ti) = n.ty {
                let args: Vec<&str> = model.types[ti]
                    .args
                    .iter()
                    .map(|a| model.types[*a].spelling.as_str())
                    .collect();
                return format!("{}({})", n.spelling, args.join(", "));
            }
        }
        n.spelling.clone()
    }

    fn cursor_usr(&self, cursor: RawCursor) -> String {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return String::new();
        };
        let state = self.state.borrow();
        let n = &state.unit(unit).model.nodes[node];
        if is_decl(n.kind) && !n.spelling.is_empty() {
            format!("c:@{}", n.spelling)
        } else {
            String::new()
        }
    }

    fn cursor_hash(&self, cursor: RawCursor) -> u32 {
        let mut hasher = FxHasher::default();
        cursor.data.hash(&mut hasher);
        hasher.finish() as u32
    }

    fn cursor_eq(&self, a: RawCursor, b: RawCursor) -> bool {
        a.data == b.data
    }

    fn cursor_location(&self, cursor: RawCursor) -> RawLocation {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return RawLocation::NULL;
        };
        let state = self.state.borrow();
        let data = state.unit(unit);
        let text = &state.file(data.main_file).contents;
        make_location(data.main_file, text, data.model.nodes[node].start)
    }

    fn cursor_extent(&self, cursor: RawCursor) -> RawRange {
        match decode_cursor(cursor) {
            Some((unit, node)) => self.node_range(unit, node),
            None => RawRange::NULL,
        }
    }

    fn cursor_semantic_parent(&self, cursor: RawCursor) -> RawCursor {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return RawCursor::NULL;
        };
        let state = self.state.borrow();
        let model = &state.unit(unit).model;
        match model.nodes[node].parent {
            Some(p) => cursor_raw(unit, p, model.nodes[p].kind),
            None => RawCursor::NULL,
        }
    }

    fn cursor_lexical_parent(&self, cursor: RawCursor) -> RawCursor {
        self.cursor_semantic_parent(cursor)
    }

    fn cursor_definition(&self, cursor: RawCursor) -> RawCursor {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return RawCursor::NULL;
        };
        let state = self.state.borrow();
        let model = &state.unit(unit).model;
        if is_decl(model.nodes[node].kind) {
            cursor_raw(unit, node, model.nodes[node].kind)
        } else {
            RawCursor::NULL
        }
    }

    fn cursor_referenced(&self, cursor: RawCursor) -> RawCursor {
        self.cursor_definition(cursor)
    }

    fn cursor_type(&self, cursor: RawCursor) -> RawType {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return RawType::INVALID;
        };
        let state = self.state.borrow();
        let model = &state.unit(unit).model;
        match model.nodes[node].ty {
            Some(ti) => type_raw(unit, ti, model.types[ti].kind),
            None => RawType::INVALID,
        }
    }

    fn cursor_linkage(&self, cursor: RawCursor) -> u32 {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return 0;
        };
        let state = self.state.borrow();
        let n = &state.unit(unit).model.nodes[node];
        match n.kind {
            kind::VAR_DECL | kind::FUNCTION_DECL | kind::STRUCT_DECL => {
                if n.storage == storage::STATIC {
                    2 // internal
                } else {
                    4 // external
                }
            }
            kind::PARM_DECL | kind::FIELD_DECL => 1, // no_linkage
            _ => 0,
        }
    }

    fn cursor_visibility(&self, cursor: RawCursor) -> u32 {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return 0;
        };
        let state = self.state.borrow();
        if is_decl(state.unit(unit).model.nodes[node].kind) {
            3 // default
        } else {
            0
        }
    }

    fn cursor_availability(&self, cursor: RawCursor) -> u32 {
        let _ = cursor;
        0 // available
    }

    fn cursor_language(&self, cursor: RawCursor) -> u32 {
        if decode_cursor(cursor).is_some() { 1 } else { 0 }
    }

    fn cursor_tls_kind(&self, cursor: RawCursor) -> u32 {
        let _ = cursor;
        0
    }

    fn cursor_storage_class(&self, cursor: RawCursor) -> u32 {
        let Some((unit, node)) = decode_cursor(cursor) else {
            return 0;
        };
        let state = self.state.borrow();
        let n = &state.unit(unit).model.nodes[node];
        if is_decl(n.kind) { n.storage } else { 0 }
    }

    fn visit_children(&self, root: RawCursor, visitor: &mut ChildVisitFn<'_>) -> bool {
        match decode_cursor(root) {
            Some((unit, node)) => self.walk(unit, node, root, visitor),
            None => false,
        }
    }

    fn find_references(
        &self,
        cursor: RawCursor,
        file: RawFile,
        visitor: &mut ReferenceVisitFn<'_>,
    ) {
        let Some((unit_id, node)) = decode_cursor(cursor) else {
            return;
        };
        let matches: Vec<(RawCursor, RawRange)> = {
            let state = self.state.borrow();
            let data = state.unit(unit_id);
            if !file.is_null() && file.0 != data.main_file {
                return;
            }
            let target = data.model.nodes[node].spelling.clone();
            if target.is_empty() {
                return;
            }
            let text = &state.file(data.main_file).contents;
            data.model
                .nodes
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(_, n)| n.spelling == target)
                .map(|(i, n)| {
                    (
                        cursor_raw(unit_id, i, n.kind),
                        RawRange {
                            start: make_location(data.main_file, text, n.start),
                            end: make_location(data.main_file, text, n.end),
                        },
                    )
                })
                .collect()
        };
        for (c, r) in matches {
            if visitor(c, r) == 0 {
                break;
            }
        }
    }

    // --- types ---

    fn type_kind(&self, ty: RawType) -> u32 {
        ty.kind
    }

    fn type_spelling(&self, ty: RawType) -> String {
        let Some((unit, index)) = decode_type(ty) else {
            return String::new();
        };
        let state = self.state.borrow();
        state.unit(unit).model.types[index].spelling.clone()
    }

    fn type_canonical(&self, ty: RawType) -> RawType {
        ty
    }

    fn type_pointee(&self, ty: RawType) -> RawType {
        let Some((unit, index)) = decode_type(ty) else {
            return RawType::INVALID;
        };
        let state = self.state.borrow();
        let types = &state.unit(unit).model.types;
        match types[index].pointee {
            Some(p) => type_raw(unit, p, types[p].kind),
            None => RawType::INVALID,
        }
    }

    fn type_result(&self, ty: RawType) -> RawType {
        let Some((unit, index)) = decode_type(ty) else {
            return RawType::INVALID;
        };
        let state = self.state.borrow();
        let types = &state.unit(unit).model.types;
        match types[index].result {
            Some(r) => type_raw(unit, r, types[r].kind),
            None => RawType::INVALID,
        }
    }

    fn type_num_args(&self, ty: RawType) -> i32 {
        let Some((unit, index)) = decode_type(ty) else {
            return -1;
        };
        let state = self.state.borrow();
        let rec = &state.unit(unit).model.types[index];
        if rec.kind == type_kind::FUNCTION_PROTO {
            rec.args.len() as i32
        } else {
            -1
        }
    }

    fn type_arg(&self, ty: RawType, index: u32) -> RawType {
        let Some((unit, ti)) = decode_type(ty) else {
            return RawType::INVALID;
        };
        let state = self.state.borrow();
        let types = &state.unit(unit).model.types;
        match types[ti].args.get(index as usize) {
            Some(a) => type_raw(unit, *a, types[*a].kind),
            None => RawType::INVALID,
        }
    }

    fn type_size_of(&self, ty: RawType) -> i64 {
        let Some((unit, index)) = decode_type(ty) else {
            return -1;
        };
        self.state.borrow().unit(unit).model.types[index].size
    }

    fn type_align_of(&self, ty: RawType) -> i64 {
        let Some((unit, index)) = decode_type(ty) else {
            return -1;
        };
        self.state.borrow().unit(unit).model.types[index].align
    }

    fn visit_fields(&self, ty: RawType, visitor: &mut FieldVisitFn<'_>) -> bool {
        let Some((unit_id, index)) = decode_type(ty) else {
            return false;
        };
        let fields: Vec<RawCursor> = {
            let state = self.state.borrow();
            let model = &state.unit(unit_id).model;
            let Some(decl) = model.types[index].decl else {
                return false;
            };
            model.nodes[decl]
                .children
                .iter()
                .filter(|c| model.nodes[**c].kind == kind::FIELD_DECL)
                .map(|c| cursor_raw(unit_id, *c, kind::FIELD_DECL))
                .collect()
        };
        for field in fields {
            if visitor(field) == 0 {
                return true;
            }
        }
        false
    }

    // --- tokens ---

    fn tokenize(&self, unit: RawUnit, range: RawRange) -> RawTokenArray {
        let (file_id, text) = {
            let state = self.state.borrow();
            let data = state.unit(unit.0);
            let fid = if range.start.data[0] != 0 {
                range.start.data[0]
            } else {
                data.main_file
            };
            (fid, state.file(fid).contents.clone())
        };
        let start = (range.start.data[2] as usize).min(text.len());
        let end = (range.end.data[2] as usize).min(text.len()).max(start);
        let mut toks = lex(&text[start..end]);
        for t in &mut toks {
            t.start += start;
            t.end += start;
        }
        let mut state = self.state.borrow_mut();
        let id = state.mint();
        state
            .token_arrays
            .insert(id, TokenArrayData { file: file_id, toks });
        RawTokenArray(id)
    }

    fn dispose_tokens(&self, _unit: RawUnit, tokens: RawTokenArray) {
        if self
            .state
            .borrow_mut()
            .token_arrays
            .remove(&tokens.0)
            .is_none()
        {
            panic!("stub: double dispose of token array {}", tokens.0);
        }
    }

    fn token_count(&self, tokens: RawTokenArray) -> u32 {
        self.state.borrow().tokens(tokens.0).toks.len() as u32
    }

    fn token_at(&self, tokens: RawTokenArray, index: u32) -> RawToken {
        self.state.borrow().tokens(tokens.0); // existence check
        RawToken {
            data: [tokens.0, u64::from(index), 0, 0],
        }
    }

    fn token_kind(&self, token: RawToken) -> u32 {
        let state = self.state.borrow();
        state.tokens(token.data[0]).toks[token.data[1] as usize]
            .tok
            .kind_code()
    }

    fn token_spelling(&self, _unit: RawUnit, token: RawToken) -> String {
        let state = self.state.borrow();
        state.tokens(token.data[0]).toks[token.data[1] as usize]
            .text
            .clone()
    }

    fn token_location(&self, _unit: RawUnit, token: RawToken) -> RawLocation {
        let state = self.state.borrow();
        let array = state.tokens(token.data[0]);
        let text = &state.file(array.file).contents;
        make_location(array.file, text, array.toks[token.data[1] as usize].start)
    }

    fn token_extent(&self, _unit: RawUnit, token: RawToken) -> RawRange {
        let state = self.state.borrow();
        let array = state.tokens(token.data[0]);
        let text = &state.file(array.file).contents;
        let t = &array.toks[token.data[1] as usize];
        RawRange {
            start: make_location(array.file, text, t.start),
            end: make_location(array.file, text, t.end),
        }
    }

    fn annotate_tokens(&self, unit: RawUnit, tokens: RawTokenArray) -> Vec<RawCursor> {
        let state = self.state.borrow();
        let data = state.unit(unit.0);
        state
            .tokens(tokens.0)
            .toks
            .iter()
            .map(|t| match deepest_at(&data.model, t.start) {
                Some(n) => cursor_raw(unit.0, n, data.model.nodes[n].kind),
                None => RawCursor::NULL,
            })
            .collect()
    }

    // --- diagnostics ---

    fn diagnostic_count(&self, unit: RawUnit) -> u32 {
        self.state.borrow().unit(unit.0).model.diagnostics.len() as u32
    }

    fn diagnostic(&self, unit: RawUnit, index: u32) -> RawDiagnostic {
        let mut state = self.state.borrow_mut();
        let data = state.unit(unit.0);
        let file = Some(data.main_file);
        let diag = data
            .model
            .diagnostics
            .get(index as usize)
            .unwrap_or_else(|| panic!("stub: diagnostic index {index} out of range"))
            .clone();
        let id = state.mint();
        state.diags.insert(id, DiagHandle { data: diag, file });
        RawDiagnostic(id)
    }

    fn dispose_diagnostic(&self, diagnostic: RawDiagnostic) {
        if self.state.borrow_mut().diags.remove(&diagnostic.0).is_none() {
            panic!("stub: double dispose of diagnostic {}", diagnostic.0);
        }
    }

    fn diagnostic_set_from_unit(&self, unit: RawUnit) -> RawDiagnosticSet {
        let mut state = self.state.borrow_mut();
        let data = state.unit(unit.0);
        let set = DiagSetData {
            diags: data.model.diagnostics.clone(),
            file: Some(data.main_file),
            owned: true,
        };
        let id = state.mint();
        state.diag_sets.insert(id, set);
        RawDiagnosticSet(id)
    }

    fn load_diagnostics(&self, path: &str) -> std::result::Result<RawDiagnosticSet, String> {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let diags: Vec<DiagData> = serde_json::from_str(&text).map_err(|e| e.to_string())?;
        let mut state = self.state.borrow_mut();
        let id = state.mint();
        state.diag_sets.insert(
            id,
            DiagSetData {
                diags,
                file: None,
                owned: true,
            },
        );
        Ok(RawDiagnosticSet(id))
    }

    fn dispose_diagnostic_set(&self, set: RawDiagnosticSet) {
        let Some(data) = self.state.borrow_mut().diag_sets.remove(&set.0) else {
            panic!("stub: double dispose of diagnostic set {}", set.0);
        };
        if !data.owned {
            panic!("stub: disposed a non-owned child diagnostic set {}", set.0);
        }
    }

    fn diagnostic_set_count(&self, set: RawDiagnosticSet) -> u32 {
        self.state.borrow().diag_set(set.0).diags.len() as u32
    }

    fn diagnostic_in_set(&self, set: RawDiagnosticSet, index: u32) -> RawDiagnostic {
        let mut state = self.state.borrow_mut();
        let data = state.diag_set(set.0);
        let file = data.file;
        let diag = data
            .diags
            .get(index as usize)
            .unwrap_or_else(|| panic!("stub: diagnostic index {index} out of range"))
            .clone();
        let id = state.mint();
        state.diags.insert(id, DiagHandle { data: diag, file });
        RawDiagnostic(id)
    }

    fn diagnostic_severity(&self, diagnostic: RawDiagnostic) -> u32 {
        self.state.borrow().diag(diagnostic.0).data.severity
    }

    fn diagnostic_spelling(&self, diagnostic: RawDiagnostic) -> String {
        self.state.borrow().diag(diagnostic.0).data.message.clone()
    }

    fn diagnostic_location(&self, diagnostic: RawDiagnostic) -> RawLocation {
        let state = self.state.borrow();
        let h = state.diag(diagnostic.0);
        RawLocation {
            data: [
                h.file.unwrap_or(0),
                (u64::from(h.data.line) << 32) | u64::from(h.data.column),
                u64::from(h.data.offset),
            ],
        }
    }

    fn diagnostic_format(&self, diagnostic: RawDiagnostic, display_mask: u32) -> String {
        let state = self.state.borrow();
        let h = state.diag(diagnostic.0);
        let mut out = String::new();
        if display_mask & 0x01 != 0 {
            if let Some(f) = h.file {
                out.push_str(&state.file(f).name);
                out.push_str(&format!(":{}", h.data.line));
                if display_mask & 0x02 != 0 {
                    out.push_str(&format!(":{}", h.data.column));
                }
                out.push_str(": ");
            }
        }
        out.push_str(severity_name(h.data.severity));
        out.push_str(": ");
        out.push_str(&h.data.message);
        out
    }

    fn diagnostic_children(&self, diagnostic: RawDiagnostic) -> RawDiagnosticSet {
        let mut state = self.state.borrow_mut();
        let h = state.diag(diagnostic.0);
        let set = DiagSetData {
            diags: h.data.children.clone(),
            file: h.file,
            owned: false,
        };
        let id = state.mint();
        state.diag_sets.insert(id, set);
        RawDiagnosticSet(id)
    }

    fn default_diagnostic_display_options(&self) -> u32 {
        // display_source_location | display_column | display_option
        0x01 | 0x02 | 0x08
    }

    // --- comments ---

    fn cursor_comment_range(&self, cursor: RawCursor) -> RawRange {
        let Some((unit_id, node)) = decode_cursor(cursor) else {
            return RawRange::NULL;
        };
        let state = self.state.borrow();
        let data = state.unit(unit_id);
        let Some(ci) = data.model.nodes[node].comment else {
            return RawRange::NULL;
        };
        let c = &data.model.comments[ci];
        let text = &state.file(data.main_file).contents;
        RawRange {
            start: make_location(data.main_file, text, c.start),
            end: make_location(data.main_file, text, c.end),
        }
    }

    fn cursor_raw_comment_text(&self, cursor: RawCursor) -> String {
        let Some((unit_id, node)) = decode_cursor(cursor) else {
            return String::new();
        };
        let state = self.state.borrow();
        let model = &state.unit(unit_id).model;
        match model.nodes[node].comment {
            Some(ci) => model.comments[ci].text.clone(),
            None => String::new(),
        }
    }

    fn cursor_brief_comment_text(&self, cursor: RawCursor) -> String {
        let Some((unit_id, node)) = decode_cursor(cursor) else {
            return String::new();
        };
        let state = self.state.borrow();
        let model = &state.unit(unit_id).model;
        let Some(mut ci) = model.nodes[node].comment else {
            return String::new();
        };
        // First text node under full -> paragraph.
        while model.comments[ci].kind != comment_kind::TEXT {
            match model.comments[ci].children.first() {
                Some(child) => ci = *child,
                None => return String::new(),
            }
        }
        model.comments[ci].text.clone()
    }

    fn cursor_parsed_comment(&self, cursor: RawCursor) -> RawComment {
        let Some((unit_id, node)) = decode_cursor(cursor) else {
            return RawComment::NULL;
        };
        let state = self.state.borrow();
        let model = &state.unit(unit_id).model;
        match model.nodes[node].comment {
            Some(ci) => RawComment {
                kind: model.comments[ci].kind,
                data: [unit_id, ci as u64 + 1],
            },
            None => RawComment::NULL,
        }
    }

    fn comment_kind(&self, comment: RawComment) -> u32 {
        comment.kind
    }

    fn comment_child_count(&self, comment: RawComment) -> u32 {
        let Some((unit_id, ci)) = decode_comment(comment) else {
            return 0;
        };
        let state = self.state.borrow();
        state.unit(unit_id).model.comments[ci].children.len() as u32
    }

    fn comment_child(&self, comment: RawComment, index: u32) -> RawComment {
        let Some((unit_id, ci)) = decode_comment(comment) else {
            return RawComment::NULL;
        };
        let state = self.state.borrow();
        let comments = &state.unit(unit_id).model.comments;
        match comments[ci].children.get(index as usize) {
            Some(child) => RawComment {
                kind: comments[*child].kind,
                data: [unit_id, *child as u64 + 1],
            },
            None => RawComment::NULL,
        }
    }

    fn comment_text(&self, comment: RawComment) -> String {
        let Some((unit_id, ci)) = decode_comment(comment) else {
            return String::new();
        };
        let state = self.state.borrow();
        let c = &state.unit(unit_id).model.comments[ci];
        if c.kind == comment_kind::TEXT {
            c.text.clone()
        } else {
            String::new()
        }
    }

    // --- modules ---

    fn cursor_module(&self, _cursor: RawCursor) -> RawModule {
        RawModule::NULL
    }

    fn module_name(&self, _module: RawModule) -> String {
        String::new()
    }

    fn module_full_name(&self, _module: RawModule) -> String {
        String::new()
    }

    fn module_top_level_header_count(&self, _unit: RawUnit, _module: RawModule) -> u32 {
        0
    }

    fn module_top_level_header(&self, _unit: RawUnit, _module: RawModule, _index: u32) -> RawFile {
        RawFile::NULL
    }

    // --- code completion ---

    fn code_complete_at(
        &self,
        unit: RawUnit,
        _path: &str,
        _line: u32,
        _column: u32,
        _unsaved: &[UnsavedFile],
        _flags: u32,
    ) -> RawCompletionResults {
        let mut state = self.state.borrow_mut();
        let data = state.unit(unit.0);
        let model = &data.model;
        let mut results = Vec::new();
        for child in &model.nodes[SourceModel::ROOT].children {
            let n = &model.nodes[*child];
            if n.spelling.is_empty() || !is_decl(n.kind) {
                continue;
            }
            let mut chunks = Vec::new();
            if let Some(ti) = n.ty {
                let result_spelling = match model.types[ti].result {
                    Some(r) => model.types[r].spelling.clone(),
                    None => model.types[ti].spelling.clone(),
                };
                chunks.push((15, result_spelling)); // result_type
            }
            chunks.push((1, n.spelling.clone())); // typed_text
            if n.kind == kind::FUNCTION_DECL {
                chunks.push((6, "(".to_string()));
                if let Some(ti) = n.ty {
                    for (i, a) in model.types[ti].args.clone().iter().enumerate() {
                        if i > 0 {
                            chunks.push((14, ", ".to_string())); // comma
                        }
                        chunks.push((3, model.types[*a].spelling.clone())); // placeholder
                    }
                }
                chunks.push((7, ")".to_string()));
            }
            results.push(CompletionItem {
                kind: n.kind,
                chunks,
            });
        }
        let id = state.mint();
        state.completions.insert(id, CompletionData { results });
        RawCompletionResults(id)
    }

    fn dispose_completion_results(&self, results: RawCompletionResults) {
        if self
            .state
            .borrow_mut()
            .completions
            .remove(&results.0)
            .is_none()
        {
            panic!("stub: double dispose of completion results {}", results.0);
        }
    }

    fn completion_result_count(&self, results: RawCompletionResults) -> u32 {
        self.state.borrow().completion(results.0).results.len() as u32
    }

    fn completion_result_kind(&self, results: RawCompletionResults, index: u32) -> u32 {
        self.state.borrow().completion(results.0).results[index as usize].kind
    }

    fn completion_result_string(
        &self,
        results: RawCompletionResults,
        index: u32,
    ) -> RawCompletionString {
        self.state.borrow().completion(results.0); // existence check
        RawCompletionString((results.0 << 16) | u64::from(index))
    }

    fn completion_chunk_count(&self, string: RawCompletionString) -> u32 {
        let state = self.state.borrow();
        let data = state.completion(string.0 >> 16);
        data.results[(string.0 & 0xffff) as usize].chunks.len() as u32
    }

    fn completion_chunk_kind(&self, string: RawCompletionString, index: u32) -> u32 {
        let state = self.state.borrow();
        let data = state.completion(string.0 >> 16);
        data.results[(string.0 & 0xffff) as usize].chunks[index as usize].0
    }

    fn completion_chunk_text(&self, string: RawCompletionString, index: u32) -> String {
        let state = self.state.borrow();
        let data = state.completion(string.0 >> 16);
        data.results[(string.0 & 0xffff) as usize].chunks[index as usize]
            .1
            .clone()
    }

    fn default_code_complete_flags(&self) -> u32 {
        0x01 // include_macros
    }

    // --- standalone handles ---

    fn create_overlay(&self, case_sensitive: bool) -> RawOverlay {
        let mut state = self.state.borrow_mut();
        let id = state.mint();
        state.overlays.insert(
            id,
            OverlayData {
                case_sensitive,
                mappings: Vec::new(),
            },
        );
        RawOverlay(id)
    }

    fn overlay_add_mapping(
        &self,
        overlay: RawOverlay,
        virtual_path: &str,
        real_path: &str,
    ) -> std::result::Result<(), ErrorCode> {
        if !virtual_path.starts_with('/') {
            return Err(ErrorCode::InvalidArguments);
        }
        let mut state = self.state.borrow_mut();
        let Some(data) = state.overlays.get_mut(&overlay.0) else {
            panic!("stub: unknown or disposed overlay {}", overlay.0);
        };
        data.mappings
            .push((virtual_path.to_string(), real_path.to_string()));
        Ok(())
    }

    fn overlay_write(&self, overlay: RawOverlay) -> std::result::Result<Vec<u8>, ErrorCode> {
        let state = self.state.borrow();
        let Some(data) = state.overlays.get(&overlay.0) else {
            panic!("stub: unknown or disposed overlay {}", overlay.0);
        };
        let roots: Vec<_> = data
            .mappings
            .iter()
            .map(|(v, r)| json!({"type": "file", "name": v, "external-contents": r}))
            .collect();
        let value = json!({
            "version": 0,
            "case-sensitive": data.case_sensitive,
            "roots": roots,
        });
        serde_json::to_vec_pretty(&value).map_err(|_| ErrorCode::Failure)
    }

    fn dispose_overlay(&self, overlay: RawOverlay) {
        if self.state.borrow_mut().overlays.remove(&overlay.0).is_none() {
            panic!("stub: double dispose of overlay {}", overlay.0);
        }
    }

    fn create_module_map(
        &self,
        name: &str,
        umbrella_header: &str,
    ) -> std::result::Result<RawModuleMap, ErrorCode> {
        if name.is_empty() || umbrella_header.is_empty() {
            return Err(ErrorCode::InvalidArguments);
        }
        let mut state = self.state.borrow_mut();
        let id = state.mint();
        state.module_maps.insert(
            id,
            ModuleMapData {
                name: name.to_string(),
                umbrella: umbrella_header.to_string(),
            },
        );
        Ok(RawModuleMap(id))
    }

    fn module_map_write(&self, map: RawModuleMap) -> std::result::Result<Vec<u8>, ErrorCode> {
        let state = self.state.borrow();
        let Some(data) = state.module_maps.get(&map.0) else {
            panic!("stub: unknown or disposed module map {}", map.0);
        };
        let text = format!(
            "framework module {} {{\n  umbrella header \"{}\"\n\n  export *\n  module * {{ export * }}\n}}\n",
            data.name, data.umbrella
        );
        Ok(text.into_bytes())
    }

    fn dispose_module_map(&self, map: RawModuleMap) {
        if self.state.borrow_mut().module_maps.remove(&map.0).is_none() {
            panic!("stub: double dispose of module map {}", map.0);
        }
    }

    fn create_remapping(&self, path: &str) -> RawRemapping {
        let Ok(text) = fs::read_to_string(path) else {
            return RawRemapping::NULL;
        };
        let Ok(entries) = serde_json::from_str::<Vec<(String, String)>>(&text) else {
            return RawRemapping::NULL;
        };
        let mut state = self.state.borrow_mut();
        let id = state.mint();
        state.remappings.insert(id, entries);
        RawRemapping(id)
    }

    fn remapping_count(&self, remapping: RawRemapping) -> u32 {
        let state = self.state.borrow();
        match state.remappings.get(&remapping.0) {
            Some(entries) => entries.len() as u32,
            None => panic!("stub: unknown or disposed remapping {}", remapping.0),
        }
    }

    fn remapping_entry(&self, remapping: RawRemapping, index: u32) -> (String, String) {
        let state = self.state.borrow();
        match state.remappings.get(&remapping.0) {
            Some(entries) => entries[index as usize].clone(),
            None => panic!("stub: unknown or disposed remapping {}", remapping.0),
        }
    }

    fn dispose_remapping(&self, remapping: RawRemapping) {
        if self
            .state
            .borrow_mut()
            .remappings
            .remove(&remapping.0)
            .is_none()
        {
            panic!("stub: double dispose of remapping {}", remapping.0);
        }
    }

    fn cursor_printing_policy(&self, _cursor: RawCursor) -> RawPolicy {
        let mut state = self.state.borrow_mut();
        let id = state.mint();
        let mut props = FxHashMap::default();
        props.insert(0, 2); // indentation
        state.policies.insert(id, props);
        RawPolicy(id)
    }

    fn policy_property(&self, policy: RawPolicy, property: u32) -> u32 {
        let state = self.state.borrow();
        match state.policies.get(&policy.0) {
            Some(props) => props.get(&property).copied().unwrap_or(0),
            None => panic!("stub: unknown or disposed printing policy {}", policy.0),
        }
    }

    fn set_policy_property(&self, policy: RawPolicy, property: u32, value: u32) {
        let mut state = self.state.borrow_mut();
        match state.policies.get_mut(&policy.0) {
            Some(props) => {
                props.insert(property, value);
            }
            None => panic!("stub: unknown or disposed printing policy {}", policy.0),
        }
    }

    fn dispose_policy(&self, policy: RawPolicy) {
        if self.state.borrow_mut().policies.remove(&policy.0).is_none() {
            panic!("stub: double dispose of printing policy {}", policy.0);
        }
    }

    fn pretty_print(&self, cursor: RawCursor, policy: RawPolicy) -> String {
        let Some((unit_id, node)) = decode_cursor(cursor) else {
            return String::new();
        };
        let state = self.state.borrow();
        let suppress_initializers = state
            .policies
            .get(&policy.0)
            .and_then(|p| p.get(&6))
            .copied()
            .unwrap_or(0)
            != 0;
        let model = &state.unit(unit_id).model;
        let n = &model.nodes[node];
        let ty_spelling = |ti: Option<usize>| -> String {
            ti.map(|t| model.types[t].spelling.clone()).unwrap_or_default()
        };
        match n.kind {
            kind::VAR_DECL | kind::FIELD_DECL | kind::PARM_DECL => {
                let mut out = format!("{} {}", ty_spelling(n.ty), n.spelling);
                if !suppress_initializers {
                    if let Some(init) = n.children.first() {
                        out.push_str(&format!(" = {}", model.nodes[*init].spelling));
                    }
                }
                out
            }
            kind::FUNCTION_DECL => {
                let (result, args) = match n.ty {
                    Some(ti) => {
                        let rec = &model.types[ti];
                        (
                            ty_spelling(rec.result),
                            rec.args
                                .iter()
                                .map(|a| model.types[*a].spelling.clone())
                                .collect::<Vec<_>>()
                                .join(", "),
                        )
                    }
                    None => (String::new(), String::new()),
                };
                format!("{result} {}({args})", n.spelling)
            }
            kind::STRUCT_DECL => format!("struct {}", n.spelling),
            kind::TYPEDEF_DECL => format!("typedef {}", n.spelling),
            _ => n.spelling.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Rc<StubEngine>, RawUnit) {
        let engine = Rc::new(StubEngine::new());
        let index = engine.create_index(false, false);
        let unsaved = [UnsavedFile::new("t.c", source)];
        let unit = engine
            .parse_unit(index, Some("t.c"), &[], &unsaved, 0)
            .unwrap();
        (engine, unit)
    }

    #[test]
    fn test_parse_and_root_cursor() {
        let (engine, unit) = parse("int x = 1;");
        let root = engine.unit_cursor(unit);
        assert_eq!(engine.cursor_kind(root), kind::TRANSLATION_UNIT);
        assert_eq!(engine.unit_spelling(unit), "t.c");
    }

    #[test]
    fn test_visit_collects_children() {
        let (engine, unit) = parse("int x = 1; int y;");
        let root = engine.unit_cursor(unit);
        let mut names = Vec::new();
        let mut visitor = |c: RawCursor, _p: RawCursor| -> u32 {
            names.push(engine.cursor_spelling(c));
            1 // continue
        };
        let broke = engine.visit_children(root, &mut visitor);
        assert!(!broke);
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_visit_break_stops() {
        let (engine, unit) = parse("int x; int y; int z;");
        let root = engine.unit_cursor(unit);
        let mut count = 0;
        let mut visitor = |_c: RawCursor, _p: RawCursor| -> u32 {
            count += 1;
            0 // break
        };
        let broke = engine.visit_children(root, &mut visitor);
        assert!(broke);
        assert_eq!(count, 1);
    }

    #[test]
    #[should_panic(expected = "double dispose")]
    fn test_double_dispose_unit_panics() {
        let (engine, unit) = parse("int x;");
        engine.dispose_unit(unit);
        engine.dispose_unit(unit);
    }

    #[test]
    #[should_panic(expected = "unknown or disposed")]
    fn test_use_after_dispose_panics() {
        let (engine, unit) = parse("int x;");
        engine.dispose_unit(unit);
        engine.unit_spelling(unit);
    }

    #[test]
    fn test_crash_simulation_with_recovery() {
        let engine = StubEngine::new();
        engine.toggle_crash_recovery(true);
        let index = engine.create_index(false, false);
        let err = engine
            .parse_unit(index, Some("t.c"), &["-simulate-crash".into()], &[], 0)
            .unwrap_err();
        assert_eq!(err, ErrorCode::Crashed);
    }

    #[test]
    fn test_tokenize_window() {
        let (engine, unit) = parse("int x = 1;");
        let root = engine.unit_cursor(unit);
        let range = engine.cursor_extent(root);
        let array = engine.tokenize(unit, range);
        assert_eq!(engine.token_count(array), 5);
        let tok = engine.token_at(array, 0);
        assert_eq!(engine.token_spelling(unit, tok), "int");
        assert_eq!(engine.token_kind(tok), 1); // keyword
        engine.dispose_tokens(unit, array);
    }

    #[test]
    fn test_completion_lists_declarations() {
        let (engine, unit) = parse("int x; float scale(float v);");
        let results = engine.code_complete_at(unit, "t.c", 1, 1, &[], 0);
        assert_eq!(engine.completion_result_count(results), 2);
        let s = engine.completion_result_string(results, 0);
        let text: Vec<String> = (0..engine.completion_chunk_count(s))
            .map(|i| engine.completion_chunk_text(s, i))
            .collect();
        assert!(text.contains(&"x".to_string()));
        engine.dispose_completion_results(results);
    }
}
