//! # cxlens
//!
//! Safe, introspectable handles over a C-style AST analysis engine.
//!
//! The engine performs the actual parsing and semantic analysis; this crate
//! is the layer that lets arbitrarily many long-lived, cross-referencing
//! handles into the engine's manually-managed memory be created, traversed,
//! and destroyed safely.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! support    → standalone handles (overlays, remappings, printing policies)
//! completion → code-completion result sets and their views
//! diag       → diagnostics and diagnostic sets
//! ast        → cursors, types, locations, tokens, comments, modules
//! unit       → Index and TranslationUnit root handles
//! traverse   → visit outcome vocabularies, traversal terminal states
//! handle     → disposal guard shared by every owned handle
//! stub       → in-memory Engine implementation (tests, offline use)
//! engine     → the foreign-engine boundary trait and raw payload types
//! registry   → bidirectional symbol↔code tables, mask/unmask
//! error      → error taxonomy
//! ```

/// Error taxonomy: invalid arguments, engine crashes, deserialization
pub mod error;

/// Bidirectional enum/bitmask registry with static vocabularies
pub mod registry;

/// The foreign-engine boundary: `Engine` trait and opaque raw payloads
pub mod engine;

/// In-memory engine backend for tests and engine-less environments
pub mod stub;

mod handle;

/// Traversal control: three-way and two-way visit outcomes
pub mod traverse;

/// Root handles: `Index` and `TranslationUnit`
pub mod unit;

/// Value handles into a translation unit: cursors, types, tokens, comments
pub mod ast;

/// Diagnostics and diagnostic sets
pub mod diag;

/// Code-completion result sets
pub mod completion;

/// Standalone handles with independent lifetimes
pub mod support;

pub use ast::{Comment, Cursor, File, Module, SourceLocation, SourceRange, Token, TokenSet, Type};
pub use completion::{CodeCompleteResults, CompletionString};
pub use diag::{Diagnostic, DiagnosticLocation, DiagnosticSet};
pub use engine::{Engine, EngineRef, UnsavedFile};
pub use error::{Error, Result};
pub use registry::{EnumSymbol, EnumTable};
pub use stub::StubEngine;
pub use support::{ModuleMapDescriptor, PrintingPolicy, Remapping, VirtualFileOverlay};
pub use traverse::{ChildVisit, Traversal, VisitResult};
pub use unit::{Index, TranslationUnit};

/// Human-readable engine version string. Informational only.
pub fn version(engine: &EngineRef) -> String {
    engine.version()
}

/// Enable or disable engine crash recovery. A safety net against engine
/// faults, not a cancellation mechanism.
pub fn toggle_crash_recovery(engine: &EngineRef, enabled: bool) {
    engine.toggle_crash_recovery(enabled);
}
