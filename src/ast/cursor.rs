//! Cursors: uniform references into the AST.

use smol_str::SmolStr;

use crate::ast::{Comment, Module, SourceLocation, SourceRange, Type};
use crate::engine::{Engine, RawCursor, RawRange};
use crate::registry::EnumSymbol;
use crate::registry::tables::{
    AVAILABILITY_KIND, CURSOR_KIND, LANGUAGE_KIND, LINKAGE_KIND, STORAGE_CLASS, TLS_KIND,
    VISIBILITY_KIND,
};
use crate::support::PrintingPolicy;
use crate::traverse::{ChildVisit, Traversal, VisitResult};
use crate::unit::TranslationUnit;

/// One node of the AST, any kind: declaration, statement, expression,
/// reference.
///
/// A cursor is a value handle: copying it is free, and every copy stays valid
/// exactly as long as the unit it borrows. Two cursors compare equal when the
/// engine says they denote the same node.
#[derive(Clone, Copy)]
pub struct Cursor<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawCursor,
}

impl<'tu> Cursor<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawCursor) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { unit, raw })
        }
    }

    /// The null cursor. Queries on it return invalid kinds and empty strings.
    pub(crate) fn null(unit: &'tu TranslationUnit) -> Self {
        Self {
            unit,
            raw: RawCursor::NULL,
        }
    }

    fn engine(&self) -> &'tu dyn Engine {
        self.unit.engine()
    }

    pub(crate) fn raw(&self) -> RawCursor {
        self.raw
    }

    pub fn unit(&self) -> &'tu TranslationUnit {
        self.unit
    }

    /// The node kind, as a symbol from the `cursor_kind` vocabulary. Kinds
    /// this layer does not know surface as raw codes.
    pub fn kind(&self) -> EnumSymbol {
        CURSOR_KIND.symbol(self.engine().cursor_kind(self.raw))
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// The name of the entity, e.g. a variable or function name.
    pub fn spelling(&self) -> String {
        self.engine().cursor_spelling(self.raw)
    }

    /// Like [`Self::spelling`] but with extra disambiguating detail, e.g.
    /// function parameters.
    pub fn display_name(&self) -> String {
        self.engine().cursor_display_name(self.raw)
    }

    /// Unified Symbol Resolution string: stable identity of the entity
    /// across translation units. Empty for entities without one.
    pub fn usr(&self) -> String {
        self.engine().cursor_usr(self.raw)
    }

    pub fn hash(&self) -> u32 {
        self.engine().cursor_hash(self.raw)
    }

    pub fn location(&self) -> SourceLocation<'tu> {
        SourceLocation::from_raw_or_null(self.unit, self.engine().cursor_location(self.raw))
    }

    pub fn extent(&self) -> SourceRange<'tu> {
        SourceRange::from_raw(self.unit, self.engine().cursor_extent(self.raw))
    }

    pub fn semantic_parent(&self) -> Option<Cursor<'tu>> {
        Cursor::from_raw(self.unit, self.engine().cursor_semantic_parent(self.raw))
    }

    pub fn lexical_parent(&self) -> Option<Cursor<'tu>> {
        Cursor::from_raw(self.unit, self.engine().cursor_lexical_parent(self.raw))
    }

    /// The definition of the entity this cursor refers to, if the unit
    /// contains one.
    pub fn definition(&self) -> Option<Cursor<'tu>> {
        Cursor::from_raw(self.unit, self.engine().cursor_definition(self.raw))
    }

    /// The entity a reference cursor refers to.
    pub fn referenced(&self) -> Option<Cursor<'tu>> {
        Cursor::from_raw(self.unit, self.engine().cursor_referenced(self.raw))
    }

    /// The type of the entity, when it has one.
    pub fn cursor_type(&self) -> Option<Type<'tu>> {
        Type::from_raw(self.unit, self.engine().cursor_type(self.raw))
    }

    pub fn linkage(&self) -> EnumSymbol {
        LINKAGE_KIND.symbol(self.engine().cursor_linkage(self.raw))
    }

    pub fn visibility(&self) -> EnumSymbol {
        VISIBILITY_KIND.symbol(self.engine().cursor_visibility(self.raw))
    }

    pub fn availability(&self) -> EnumSymbol {
        AVAILABILITY_KIND.symbol(self.engine().cursor_availability(self.raw))
    }

    pub fn language(&self) -> EnumSymbol {
        LANGUAGE_KIND.symbol(self.engine().cursor_language(self.raw))
    }

    pub fn tls_kind(&self) -> EnumSymbol {
        TLS_KIND.symbol(self.engine().cursor_tls_kind(self.raw))
    }

    pub fn storage_class(&self) -> EnumSymbol {
        STORAGE_CLASS.symbol(self.engine().cursor_storage_class(self.raw))
    }

    /// Depth-first pre-order walk over this cursor's subtree.
    ///
    /// The callback receives `(cursor, parent)` and steers the walk:
    /// [`ChildVisit::Break`] unwinds the whole traversal immediately,
    /// [`ChildVisit::Continue`] skips the node's children,
    /// [`ChildVisit::Recurse`] descends into them. Side effects applied
    /// before a break are kept.
    pub fn visit_children<F>(&self, mut callback: F) -> Traversal
    where
        F: FnMut(Cursor<'tu>, Cursor<'tu>) -> ChildVisit,
    {
        let unit = self.unit;
        let mut raw_visitor = |cursor: RawCursor, parent: RawCursor| -> u32 {
            callback(Cursor { unit, raw: cursor }, Cursor { unit, raw: parent }).code()
        };
        let broke = self.engine().visit_children(self.raw, &mut raw_visitor);
        Traversal::from_broke(broke)
    }

    /// Direct children, collected via a one-level walk.
    pub fn children(&self) -> Vec<Cursor<'tu>> {
        let mut out = Vec::new();
        self.visit_children(|cursor, _| {
            out.push(cursor);
            ChildVisit::Continue
        });
        out
    }

    /// Walk every reference to this entity within `file`. The two-way
    /// callback vocabulary applies: [`VisitResult::Break`] stops the walk.
    pub fn find_references<F>(&self, file: &crate::ast::File<'tu>, mut callback: F)
    where
        F: FnMut(Cursor<'tu>, SourceRange<'tu>) -> VisitResult,
    {
        let unit = self.unit;
        let mut raw_visitor = |cursor: RawCursor, range: RawRange| -> u32 {
            callback(
                Cursor { unit, raw: cursor },
                SourceRange::from_raw(unit, range),
            )
            .code()
        };
        self.engine()
            .find_references(self.raw, file.raw(), &mut raw_visitor);
    }

    /// The source range of the documentation comment attached to this
    /// declaration, if any.
    pub fn comment_range(&self) -> Option<SourceRange<'tu>> {
        let raw = self.engine().cursor_comment_range(self.raw);
        if raw.is_null() {
            None
        } else {
            Some(SourceRange::from_raw(self.unit, raw))
        }
    }

    /// Unparsed text of the attached documentation comment.
    pub fn raw_comment_text(&self) -> Option<String> {
        let text = self.engine().cursor_raw_comment_text(self.raw);
        if text.is_empty() { None } else { Some(text) }
    }

    /// First-paragraph summary of the attached documentation comment.
    pub fn brief_comment_text(&self) -> Option<String> {
        let text = self.engine().cursor_brief_comment_text(self.raw);
        if text.is_empty() { None } else { Some(text) }
    }

    /// The attached documentation comment as a parsed tree.
    pub fn parsed_comment(&self) -> Option<Comment<'tu>> {
        Comment::from_raw(self.unit, self.engine().cursor_parsed_comment(self.raw))
    }

    /// The module a `module_import_decl` cursor imports.
    pub fn module(&self) -> Option<Module<'tu>> {
        Module::from_raw(self.unit, self.engine().cursor_module(self.raw))
    }

    /// A printing policy seeded from this cursor's language options.
    pub fn printing_policy(&self) -> PrintingPolicy {
        PrintingPolicy::from_cursor(self)
    }

    /// Pretty-print the entity under `policy`.
    pub fn pretty_print(&self, policy: &PrintingPolicy) -> String {
        self.engine().pretty_print(self.raw, policy.raw())
    }

    /// Convenience predicate on the kind symbol.
    pub fn is_kind(&self, name: &str) -> bool {
        self.kind() == name
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.engine().cursor_eq(self.raw, other.raw)
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("kind", &SmolStr::new(self.kind().to_string()))
            .field("spelling", &self.spelling())
            .finish()
    }
}
