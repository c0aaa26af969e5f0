//! Standalone handles with lifetimes independent of any translation unit:
//! virtual file overlays, module map descriptors, remappings, and printing
//! policies.

use std::rc::Rc;

use crate::ast::Cursor;
use crate::engine::{Engine, EngineRef, RawModuleMap, RawOverlay, RawPolicy, RawRemapping};
use crate::error::Result;
use crate::handle::Owned;
use crate::registry::tables::PRINTING_POLICY_PROPERTY;

fn dispose_overlay(engine: &dyn Engine, overlay: RawOverlay) {
    engine.dispose_overlay(overlay);
}

fn dispose_module_map(engine: &dyn Engine, map: RawModuleMap) {
    engine.dispose_module_map(map);
}

fn dispose_remapping(engine: &dyn Engine, remapping: RawRemapping) {
    engine.dispose_remapping(remapping);
}

fn dispose_policy(engine: &dyn Engine, policy: RawPolicy) {
    engine.dispose_policy(policy);
}

/// Maps virtual file paths onto real files for engines resolving includes
/// through a synthetic filesystem layout.
pub struct VirtualFileOverlay {
    handle: Owned<RawOverlay>,
}

impl VirtualFileOverlay {
    pub fn new(engine: &EngineRef, case_sensitive: bool) -> Self {
        let raw = engine.create_overlay(case_sensitive);
        Self {
            handle: Owned::adopt(Rc::clone(engine), raw, dispose_overlay),
        }
    }

    pub fn add_mapping(&self, virtual_path: &str, real_path: &str) -> Result<()> {
        self.handle
            .engine()
            .overlay_add_mapping(self.handle.payload(), virtual_path, real_path)
            .map_err(|code| code.into_error("overlay mapping"))
    }

    /// Serialize the overlay to its on-disk interchange format.
    pub fn write_to_buffer(&self) -> Result<Vec<u8>> {
        self.handle
            .engine()
            .overlay_write(self.handle.payload())
            .map_err(|code| code.into_error("overlay buffer"))
    }
}

/// Describes one module (name plus umbrella header) in the engine's module
/// map format.
pub struct ModuleMapDescriptor {
    handle: Owned<RawModuleMap>,
}

impl std::fmt::Debug for ModuleMapDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleMapDescriptor")
            .field("raw", &self.handle.payload().0)
            .finish()
    }
}

impl ModuleMapDescriptor {
    pub fn new(engine: &EngineRef, module_name: &str, umbrella_header: &str) -> Result<Self> {
        let raw = engine
            .create_module_map(module_name, umbrella_header)
            .map_err(|code| code.into_error("module map"))?;
        Ok(Self {
            handle: Owned::adopt(Rc::clone(engine), raw, dispose_module_map),
        })
    }

    pub fn write_to_buffer(&self) -> Result<Vec<u8>> {
        self.handle
            .engine()
            .module_map_write(self.handle.payload())
            .map_err(|code| code.into_error("module map buffer"))
    }
}

/// Path remapping metadata loaded from a file: ordered pairs of original and
/// transformed paths.
pub struct Remapping {
    handle: Owned<RawRemapping>,
}

impl Remapping {
    /// Load remapping metadata; `None` when `path` holds none.
    pub fn load(engine: &EngineRef, path: &str) -> Option<Self> {
        let raw = engine.create_remapping(path);
        if raw.is_null() {
            return None;
        }
        Some(Self {
            handle: Owned::adopt(Rc::clone(engine), raw, dispose_remapping),
        })
    }

    pub fn len(&self) -> u32 {
        self.handle.engine().remapping_count(self.handle.payload())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `(original, transformed)` pair at `index`.
    pub fn get(&self, index: u32) -> Option<(String, String)> {
        if index >= self.len() {
            return None;
        }
        Some(
            self.handle
                .engine()
                .remapping_entry(self.handle.payload(), index),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, String)> {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Controls how [`Cursor::pretty_print`](crate::Cursor::pretty_print)
/// renders an entity. Properties are addressed by symbols from the
/// `printing_policy_property` vocabulary.
pub struct PrintingPolicy {
    handle: Owned<RawPolicy>,
}

impl PrintingPolicy {
    pub(crate) fn from_cursor(cursor: &Cursor<'_>) -> Self {
        let engine = cursor.unit().engine_ref();
        let raw = engine.cursor_printing_policy(cursor.raw());
        Self {
            handle: Owned::adopt(Rc::clone(engine), raw, dispose_policy),
        }
    }

    pub(crate) fn raw(&self) -> RawPolicy {
        self.handle.payload()
    }

    /// Current value of a property; unknown property symbols read as `0`.
    pub fn property(&self, name: &str) -> u32 {
        let code = PRINTING_POLICY_PROPERTY.code(name);
        self.handle.engine().policy_property(self.raw(), code)
    }

    pub fn set_property(&self, name: &str, value: u32) {
        let code = PRINTING_POLICY_PROPERTY.code(name);
        self.handle
            .engine()
            .set_policy_property(self.raw(), code, value);
    }
}
