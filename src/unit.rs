//! Root handles: `Index` and `TranslationUnit`.
//!
//! An `Index` is the shared context translation units are created from. A
//! `TranslationUnit` owns the AST arena on the engine side and bounds the
//! validity of every cursor, type, location, token, comment, and module
//! handle derived from it.
//!
//! A unit deliberately does not hold its `Index`: index disposal only tears
//! down engine-global state the unit no longer depends on, so dropping the
//! `Index` first is legal and safe.

use std::rc::Rc;

use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::ast::{Cursor, File, SourceLocation, SourceRange, TokenSet};
use crate::completion::CodeCompleteResults;
use crate::diag::{Diagnostic, DiagnosticSet};
use crate::engine::{Engine, EngineRef, RawIndex, RawUnit, UnsavedFile};
use crate::error::Result;
use crate::handle::Owned;
use crate::registry::tables::{
    CODE_COMPLETE_FLAGS, GLOBAL_OPT_FLAGS, REPARSE_FLAGS, SAVE_TRANSLATION_UNIT_FLAGS,
    TRANSLATION_UNIT_FLAGS,
};

fn dispose_index(engine: &dyn Engine, index: RawIndex) {
    trace!(index = index.0, "disposing index");
    engine.dispose_index(index);
}

fn dispose_unit(engine: &dyn Engine, unit: RawUnit) {
    trace!(unit = unit.0, "disposing translation unit");
    engine.dispose_unit(unit);
}

/// A set of translation units that would typically be linked together.
///
/// Root owner of engine-global state. Global options are session-wide
/// configuration and should be set before units are created from the index.
pub struct Index {
    handle: Rc<Owned<RawIndex>>,
}

impl Index {
    /// Create a new index.
    ///
    /// `exclude_decls_from_pch` restricts enumeration to declarations local
    /// to each unit rather than those from precompiled headers;
    /// `display_diagnostics` lets the engine print diagnostics itself.
    pub fn new(engine: &EngineRef, exclude_decls_from_pch: bool, display_diagnostics: bool) -> Self {
        let raw = engine.create_index(exclude_decls_from_pch, display_diagnostics);
        Self {
            handle: Rc::new(Owned::adopt(Rc::clone(engine), raw, dispose_index)),
        }
    }

    /// Current global option flags, decomposed into symbols.
    pub fn global_options(&self) -> Vec<SmolStr> {
        let mask = self.engine().index_global_options(self.raw());
        GLOBAL_OPT_FLAGS.unmask(mask)
    }

    /// Set global option flags from symbols (unresolvable symbols are
    /// skipped). No built-in locking; configure before sharing.
    pub fn set_global_options<S: AsRef<str>>(&self, options: &[S]) {
        let mask = GLOBAL_OPT_FLAGS.mask(options);
        self.engine().set_index_global_options(self.raw(), mask);
    }

    /// Path for engine invocation logs, or `None` to disable logging.
    pub fn set_emission_path(&self, path: Option<&str>) {
        self.engine().set_index_emission_path(self.raw(), path);
    }

    pub(crate) fn raw(&self) -> RawIndex {
        self.handle.payload()
    }

    pub(crate) fn engine(&self) -> &dyn Engine {
        self.handle.engine()
    }

    pub(crate) fn engine_ref(&self) -> &EngineRef {
        self.handle.engine_ref()
    }
}

/// One fully parsed compilation unit. Owns the engine-side AST arena.
///
/// Reparse, save, and suspend mutate the unit in place; concurrent use
/// across threads must be serialized by the caller.
pub struct TranslationUnit {
    handle: Rc<Owned<RawUnit>>,
}

impl std::fmt::Debug for TranslationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationUnit")
            .field("raw", &self.raw().0)
            .finish()
    }
}

impl TranslationUnit {
    /// Parse a source file (or in-memory override) into a unit.
    ///
    /// `flags` are symbols from the `translation_unit_flags` vocabulary;
    /// unresolvable symbols are skipped.
    pub fn parse<S: AsRef<str>>(
        index: &Index,
        source_path: Option<&str>,
        args: &[&str],
        unsaved: &[UnsavedFile],
        flags: &[S],
    ) -> Result<Self> {
        let mask = TRANSLATION_UNIT_FLAGS.mask(flags);
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let raw = index
            .engine()
            .parse_unit(index.raw(), source_path, &args, unsaved, mask)
            .map_err(|code| code.into_error("translation unit"))?;
        debug!(unit = raw.0, source = source_path.unwrap_or("<unsaved>"), "parsed translation unit");
        Ok(Self::adopt(index.engine_ref(), raw))
    }

    /// Load a unit from a serialized AST file produced by [`Self::save`].
    pub fn load(index: &Index, ast_path: &str) -> Result<Self> {
        let raw = index
            .engine()
            .load_unit(index.raw(), ast_path)
            .map_err(|code| code.into_error("serialized AST"))?;
        debug!(unit = raw.0, path = ast_path, "loaded translation unit");
        Ok(Self::adopt(index.engine_ref(), raw))
    }

    fn adopt(engine: &EngineRef, raw: RawUnit) -> Self {
        Self {
            handle: Rc::new(Owned::adopt(Rc::clone(engine), raw, dispose_unit)),
        }
    }

    /// Original source path of this unit.
    pub fn spelling(&self) -> String {
        self.engine().unit_spelling(self.raw())
    }

    /// The root cursor, from which the whole AST is reachable.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::from_raw(self, self.engine().unit_cursor(self.raw()))
            .unwrap_or_else(|| Cursor::null(self))
    }

    /// Reparse in place, invalidating no handles at this layer but replacing
    /// the engine-side AST. `flags` come from the `reparse_flags` vocabulary.
    pub fn reparse<S: AsRef<str>>(&self, unsaved: &[UnsavedFile], flags: &[S]) -> Result<()> {
        let mask = REPARSE_FLAGS.mask(flags);
        self.engine()
            .reparse_unit(self.raw(), unsaved, mask)
            .map_err(|code| code.into_error("translation unit"))?;
        debug!(unit = self.raw().0, "reparsed translation unit");
        Ok(())
    }

    /// Serialize the unit to a file loadable by [`Self::load`].
    pub fn save<S: AsRef<str>>(&self, path: &str, flags: &[S]) -> Result<()> {
        let mask = SAVE_TRANSLATION_UNIT_FLAGS.mask(flags);
        self.engine()
            .save_unit(self.raw(), path, mask)
            .map_err(|reason| crate::Error::SaveFailed { reason })?;
        debug!(unit = self.raw().0, path, "saved translation unit");
        Ok(())
    }

    /// Free non-essential engine memory; the unit stays usable.
    pub fn suspend(&self) -> bool {
        self.engine().suspend_unit(self.raw())
    }

    /// Default flags for editing-oriented parsing, as symbols.
    pub fn default_editing_flags(engine: &EngineRef) -> Vec<SmolStr> {
        TRANSLATION_UNIT_FLAGS.unmask(engine.default_editing_flags())
    }

    /// Default save flags for this unit, as symbols.
    pub fn default_save_flags(&self) -> Vec<SmolStr> {
        SAVE_TRANSLATION_UNIT_FLAGS.unmask(self.engine().default_save_flags(self.raw()))
    }

    /// Default reparse flags for this unit, as symbols.
    pub fn default_reparse_flags(&self) -> Vec<SmolStr> {
        REPARSE_FLAGS.unmask(self.engine().default_reparse_flags(self.raw()))
    }

    /// Tokenize a source range. The returned set owns the foreign token
    /// array and releases it exactly once on drop.
    pub fn tokenize<'tu>(&'tu self, range: SourceRange<'tu>) -> TokenSet<'tu> {
        TokenSet::tokenize(self, range)
    }

    pub fn diagnostic_count(&self) -> u32 {
        self.engine().diagnostic_count(self.raw())
    }

    /// Fetch one diagnostic by index; each fetch is an independently owned
    /// handle.
    pub fn diagnostic(&self, index: u32) -> Option<Diagnostic<'_>> {
        if index >= self.diagnostic_count() {
            return None;
        }
        Some(Diagnostic::from_unit(self, index))
    }

    /// Iterate this unit's diagnostics.
    pub fn diagnostics(&self) -> impl Iterator<Item = Diagnostic<'_>> {
        (0..self.diagnostic_count()).filter_map(|i| self.diagnostic(i))
    }

    /// The complete diagnostic set for this unit.
    pub fn diagnostic_set(&self) -> Option<DiagnosticSet<'_>> {
        DiagnosticSet::from_unit(self)
    }

    /// Preprocessor-skipped ranges, in `file` or unit-wide.
    pub fn skipped_ranges(&self, file: Option<&File<'_>>) -> Vec<SourceRange<'_>> {
        self.engine()
            .skipped_ranges(self.raw(), file.map(|f| f.raw()))
            .into_iter()
            .map(|raw| SourceRange::from_raw(self, raw))
            .collect()
    }

    /// A file handle by path, if the unit knows the file.
    pub fn file(&self, path: &str) -> Option<File<'_>> {
        let raw = self.engine().file(self.raw(), path);
        File::from_raw(self, raw)
    }

    /// The location at `line`/`column` (1-based) in `file`.
    pub fn location<'tu>(
        &'tu self,
        file: &File<'tu>,
        line: u32,
        column: u32,
    ) -> Option<SourceLocation<'tu>> {
        let raw = self.engine().location(self.raw(), file.raw(), line, column);
        SourceLocation::from_raw(self, raw)
    }

    /// The cursor covering `location`.
    pub fn cursor_at<'tu>(&'tu self, location: SourceLocation<'tu>) -> Option<Cursor<'tu>> {
        Cursor::from_raw(self, self.engine().cursor_at(self.raw(), location.raw()))
    }

    /// Code completion at a position. `flags` come from the
    /// `code_complete_flags` vocabulary; an empty list means engine defaults.
    pub fn code_complete<S: AsRef<str>>(
        &self,
        path: &str,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
        flags: &[S],
    ) -> Option<CodeCompleteResults<'_>> {
        let mask = if flags.is_empty() {
            self.engine().default_code_complete_flags()
        } else {
            CODE_COMPLETE_FLAGS.mask(flags)
        };
        let raw = self
            .engine()
            .code_complete_at(self.raw(), path, line, column, unsaved, mask);
        CodeCompleteResults::from_raw(self, raw)
    }

    pub(crate) fn raw(&self) -> RawUnit {
        self.handle.payload()
    }

    pub(crate) fn engine(&self) -> &dyn Engine {
        self.handle.engine()
    }

    pub(crate) fn engine_ref(&self) -> &EngineRef {
        self.handle.engine_ref()
    }
}
