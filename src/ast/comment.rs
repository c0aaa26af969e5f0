//! Parsed documentation-comment trees.

use crate::engine::{Engine, RawComment};
use crate::registry::EnumSymbol;
use crate::registry::tables::COMMENT_KIND;
use crate::unit::TranslationUnit;

/// One node of a parsed documentation comment. Value handle, recursive via
/// [`Self::child`].
#[derive(Clone, Copy)]
pub struct Comment<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawComment,
}

impl<'tu> Comment<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawComment) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { unit, raw })
        }
    }

    fn engine(&self) -> &'tu dyn Engine {
        self.unit.engine()
    }

    /// The node kind, as a symbol from the `comment_kind` vocabulary.
    pub fn kind(&self) -> EnumSymbol {
        COMMENT_KIND.symbol(self.engine().comment_kind(self.raw))
    }

    pub fn child_count(&self) -> u32 {
        self.engine().comment_child_count(self.raw)
    }

    pub fn child(&self, index: u32) -> Option<Comment<'tu>> {
        if index >= self.child_count() {
            return None;
        }
        Comment::from_raw(self.unit, self.engine().comment_child(self.raw, index))
    }

    pub fn children(&self) -> impl Iterator<Item = Comment<'tu>> {
        let this = *self;
        (0..self.child_count()).filter_map(move |i| this.child(i))
    }

    /// Text payload of text-bearing nodes; empty for structural nodes.
    pub fn text(&self) -> String {
        self.engine().comment_text(self.raw)
    }
}

impl std::fmt::Debug for Comment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Comment")
            .field("kind", &self.kind().to_string())
            .field("children", &self.child_count())
            .finish()
    }
}
