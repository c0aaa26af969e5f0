//! Type handles.

use crate::ast::Cursor;
use crate::engine::{Engine, RawCursor, RawType};
use crate::registry::EnumSymbol;
use crate::registry::tables::TYPE_KIND;
use crate::traverse::{Traversal, VisitResult};
use crate::unit::TranslationUnit;

/// The type of an entity in the AST. A value handle, valid while its unit
/// lives.
#[derive(Clone, Copy)]
pub struct Type<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawType,
}

impl<'tu> Type<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawType) -> Option<Self> {
        if raw.is_invalid() {
            None
        } else {
            Some(Self { unit, raw })
        }
    }

    fn engine(&self) -> &'tu dyn Engine {
        self.unit.engine()
    }

    /// The type kind, as a symbol from the `type_kind` vocabulary.
    pub fn kind(&self) -> EnumSymbol {
        TYPE_KIND.symbol(self.engine().type_kind(self.raw))
    }

    pub fn spelling(&self) -> String {
        self.engine().type_spelling(self.raw)
    }

    /// The underlying type with sugar (typedefs, elaborations) removed.
    pub fn canonical(&self) -> Type<'tu> {
        Type::from_raw(self.unit, self.engine().type_canonical(self.raw)).unwrap_or(*self)
    }

    /// The pointee of a pointer or reference type.
    pub fn pointee(&self) -> Option<Type<'tu>> {
        Type::from_raw(self.unit, self.engine().type_pointee(self.raw))
    }

    /// The result type of a function type.
    pub fn result(&self) -> Option<Type<'tu>> {
        Type::from_raw(self.unit, self.engine().type_result(self.raw))
    }

    /// Number of parameters of a function type, or `None` for non-function
    /// types.
    pub fn num_args(&self) -> Option<u32> {
        let n = self.engine().type_num_args(self.raw);
        u32::try_from(n).ok()
    }

    pub fn arg(&self, index: u32) -> Option<Type<'tu>> {
        if index >= self.num_args()? {
            return None;
        }
        Type::from_raw(self.unit, self.engine().type_arg(self.raw, index))
    }

    /// Size of the type in bytes. `None` when the engine reports a layout
    /// error (incomplete, dependent, or non-constant-size types).
    pub fn size_of(&self) -> Option<u64> {
        u64::try_from(self.engine().type_size_of(self.raw)).ok()
    }

    /// Alignment of the type in bytes, `None` on layout errors.
    pub fn align_of(&self) -> Option<u64> {
        u64::try_from(self.engine().type_align_of(self.raw)).ok()
    }

    /// Walk the fields of a record type in declaration order. The two-way
    /// callback vocabulary applies: [`VisitResult::Break`] unwinds the walk.
    pub fn visit_fields<F>(&self, mut callback: F) -> Traversal
    where
        F: FnMut(Cursor<'tu>) -> VisitResult,
    {
        let unit = self.unit;
        let mut raw_visitor = |cursor: RawCursor| -> u32 {
            match Cursor::from_raw(unit, cursor) {
                Some(field) => callback(field).code(),
                None => VisitResult::Continue.code(),
            }
        };
        let broke = self.engine().visit_fields(self.raw, &mut raw_visitor);
        Traversal::from_broke(broke)
    }

    /// Field cursors of a record type, collected in declaration order.
    pub fn fields(&self) -> Vec<Cursor<'tu>> {
        let mut out = Vec::new();
        self.visit_fields(|field| {
            out.push(field);
            VisitResult::Continue
        });
        out
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl std::fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Type")
            .field("kind", &self.kind().to_string())
            .field("spelling", &self.spelling())
            .finish()
    }
}
