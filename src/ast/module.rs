//! Module handles.

use crate::ast::File;
use crate::engine::{Engine, RawModule};
use crate::unit::TranslationUnit;

/// A module associated with a translation unit. A non-owned view: the unit
/// owns the underlying module data.
#[derive(Clone, Copy)]
pub struct Module<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawModule,
}

impl<'tu> Module<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawModule) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { unit, raw })
        }
    }

    fn engine(&self) -> &'tu dyn Engine {
        self.unit.engine()
    }

    pub fn name(&self) -> String {
        self.engine().module_name(self.raw)
    }

    /// Fully qualified name, e.g. `std.vector`.
    pub fn full_name(&self) -> String {
        self.engine().module_full_name(self.raw)
    }

    pub fn top_level_header_count(&self) -> u32 {
        self.engine()
            .module_top_level_header_count(self.unit.raw(), self.raw)
    }

    pub fn top_level_header(&self, index: u32) -> Option<File<'tu>> {
        if index >= self.top_level_header_count() {
            return None;
        }
        File::from_raw(
            self.unit,
            self.engine()
                .module_top_level_header(self.unit.raw(), self.raw, index),
        )
    }
}

impl std::fmt::Debug for Module<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Module").field(&self.full_name()).finish()
    }
}
