//! Diagnostics and diagnostic sets.
//!
//! Diagnostics arrive three ways: fetched one at a time from a unit, grouped
//! in the unit's set, or loaded standalone from a serialized diagnostics
//! file. Each fetched diagnostic is an independently owned handle; child
//! sets returned by [`Diagnostic::children`] are views into memory the
//! parent diagnostic owns and are never disposed here.

use std::marker::PhantomData;
use std::rc::Rc;

use smol_str::SmolStr;
use tracing::debug;

use crate::engine::{Engine, EngineRef, RawDiagnostic, RawDiagnosticSet};
use crate::error::{Error, Result};
use crate::handle::Owned;
use crate::registry::EnumSymbol;
use crate::registry::tables::{DIAGNOSTIC_DISPLAY_OPTIONS, DIAGNOSTIC_SEVERITY};
use crate::unit::TranslationUnit;

fn dispose_diagnostic(engine: &dyn Engine, diagnostic: RawDiagnostic) {
    engine.dispose_diagnostic(diagnostic);
}

fn dispose_set(engine: &dyn Engine, set: RawDiagnosticSet) {
    engine.dispose_diagnostic_set(set);
}

/// Position of a diagnostic, with the file flattened to its name so that
/// diagnostics loaded without a translation unit still carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLocation {
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

/// One diagnostic, independently owned.
pub struct Diagnostic<'a> {
    handle: Owned<RawDiagnostic>,
    _owner: PhantomData<&'a ()>,
}

impl<'a> Diagnostic<'a> {
    pub(crate) fn from_unit(unit: &'a TranslationUnit, index: u32) -> Self {
        let raw = unit.engine().diagnostic(unit.raw(), index);
        Self {
            handle: Owned::adopt(Rc::clone(unit.engine_ref()), raw, dispose_diagnostic),
            _owner: PhantomData,
        }
    }

    fn engine(&self) -> &dyn Engine {
        self.handle.engine()
    }

    fn raw(&self) -> RawDiagnostic {
        self.handle.payload()
    }

    /// The severity, as a symbol from the `diagnostic_severity` vocabulary.
    pub fn severity(&self) -> EnumSymbol {
        DIAGNOSTIC_SEVERITY.symbol(self.engine().diagnostic_severity(self.raw()))
    }

    /// The message text, without location or option decorations.
    pub fn spelling(&self) -> String {
        self.engine().diagnostic_spelling(self.raw())
    }

    pub fn location(&self) -> DiagnosticLocation {
        let raw = self.engine().diagnostic_location(self.raw());
        let (file, line, column, offset) = self.engine().location_parts(raw);
        DiagnosticLocation {
            file: (!file.is_null()).then(|| self.engine().file_name(file)),
            line,
            column,
            offset,
        }
    }

    /// Render the diagnostic the way the engine's driver would.
    ///
    /// `options` are symbols from the `diagnostic_display_options`
    /// vocabulary; an empty list means engine defaults.
    pub fn format<S: AsRef<str>>(&self, options: &[S]) -> String {
        let mask = if options.is_empty() {
            self.engine().default_diagnostic_display_options()
        } else {
            DIAGNOSTIC_DISPLAY_OPTIONS.mask(options)
        };
        self.engine().diagnostic_format(self.raw(), mask)
    }

    /// Child diagnostics (notes attached to this one), as a view set.
    pub fn children(&self) -> DiagnosticSet<'_> {
        let raw = self.engine().diagnostic_children(self.raw());
        DiagnosticSet {
            handle: Owned::view(Rc::clone(self.handle.engine_ref()), raw),
            _owner: PhantomData,
        }
    }

    /// The engine's default display option symbols.
    pub fn default_display_options(engine: &EngineRef) -> Vec<SmolStr> {
        DIAGNOSTIC_DISPLAY_OPTIONS.unmask(engine.default_diagnostic_display_options())
    }
}

impl std::fmt::Debug for Diagnostic<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostic")
            .field("severity", &self.severity().to_string())
            .field("spelling", &self.spelling())
            .finish()
    }
}

/// A group of diagnostics: a unit's complete set, a loaded file, or the
/// children of one diagnostic.
pub struct DiagnosticSet<'a> {
    handle: Owned<RawDiagnosticSet>,
    _owner: PhantomData<&'a ()>,
}

impl std::fmt::Debug for DiagnosticSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSet")
            .field("raw", &self.handle.payload().0)
            .finish()
    }
}

impl DiagnosticSet<'static> {
    /// Load a serialized diagnostics file. The result is self-contained and
    /// owes nothing to any translation unit.
    pub fn load(engine: &EngineRef, path: &str) -> Result<Self> {
        let raw = engine
            .load_diagnostics(path)
            .map_err(Error::Deserialization)?;
        debug!(set = raw.0, path, "loaded diagnostic set");
        Ok(Self {
            handle: Owned::adopt(Rc::clone(engine), raw, dispose_set),
            _owner: PhantomData,
        })
    }
}

impl<'a> DiagnosticSet<'a> {
    pub(crate) fn from_unit(unit: &'a TranslationUnit) -> Option<Self> {
        let raw = unit.engine().diagnostic_set_from_unit(unit.raw());
        if raw.is_null() {
            return None;
        }
        Some(Self {
            handle: Owned::adopt(Rc::clone(unit.engine_ref()), raw, dispose_set),
            _owner: PhantomData,
        })
    }

    fn engine(&self) -> &dyn Engine {
        self.handle.engine()
    }

    pub fn len(&self) -> u32 {
        self.engine().diagnostic_set_count(self.handle.payload())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch one diagnostic; each fetch is independently owned.
    pub fn get(&self, index: u32) -> Option<Diagnostic<'_>> {
        if index >= self.len() {
            return None;
        }
        let raw = self.engine().diagnostic_in_set(self.handle.payload(), index);
        Some(Diagnostic {
            handle: Owned::adopt(
                Rc::clone(self.handle.engine_ref()),
                raw,
                dispose_diagnostic,
            ),
            _owner: PhantomData,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Diagnostic<'_>> {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}
