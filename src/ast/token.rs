//! Token arrays and token views.

use tracing::trace;

use crate::ast::{Cursor, SourceLocation, SourceRange};
use crate::engine::{Engine, RawToken, RawTokenArray};
use crate::registry::EnumSymbol;
use crate::registry::tables::TOKEN_KIND;
use crate::unit::TranslationUnit;

/// The tokens of one tokenize call, as a foreign array owned by this handle.
///
/// The set is the sole owner of the engine-side array and releases it exactly
/// once on drop. Individual [`Token`]s are views borrowing the set, so a
/// token cannot outlive the array that backs it:
///
/// ```compile_fail
/// use cxlens::{Index, TranslationUnit, UnsavedFile};
/// use cxlens::stub::StubEngine;
///
/// let engine = StubEngine::new_ref();
/// let index = Index::new(&engine, false, false);
/// let unsaved = [UnsavedFile::new("t.c", "int x = 1;")];
/// let unit = TranslationUnit::parse(&index, Some("t.c"), &[], &unsaved, &[] as &[&str]).unwrap();
/// let extent = unit.cursor().extent();
/// let token = {
///     let tokens = unit.tokenize(extent);
///     tokens.get(0).unwrap()
/// };
/// token.spelling(); // the backing array is gone
/// ```
pub struct TokenSet<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawTokenArray,
}

impl<'tu> TokenSet<'tu> {
    pub(crate) fn tokenize(unit: &'tu TranslationUnit, range: SourceRange<'tu>) -> Self {
        let raw = unit.engine().tokenize(unit.raw(), range.raw());
        trace!(tokens = raw.0, count = unit.engine().token_count(raw), "tokenized range");
        Self { unit, raw }
    }

    fn engine(&self) -> &'tu dyn Engine {
        self.unit.engine()
    }

    pub fn len(&self) -> u32 {
        self.engine().token_count(self.raw)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: u32) -> Option<Token<'_>> {
        if index >= self.len() {
            return None;
        }
        Some(Token {
            set: self,
            raw: self.engine().token_at(self.raw, index),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Token<'_>> {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// The cursor covering each token, index-aligned with the set. Entries
    /// are `None` where the engine maps a token to no node.
    pub fn annotate(&self) -> Vec<Option<Cursor<'tu>>> {
        self.engine()
            .annotate_tokens(self.unit.raw(), self.raw)
            .into_iter()
            .map(|raw| Cursor::from_raw(self.unit, raw))
            .collect()
    }
}

impl Drop for TokenSet<'_> {
    fn drop(&mut self) {
        trace!(tokens = self.raw.0, "disposing token array");
        self.engine().dispose_tokens(self.unit.raw(), self.raw);
    }
}

/// One token, viewing memory owned by its [`TokenSet`].
#[derive(Clone, Copy)]
pub struct Token<'a> {
    set: &'a TokenSet<'a>,
    raw: RawToken,
}

impl<'a> Token<'a> {
    fn engine(&self) -> &'a dyn Engine {
        self.set.engine()
    }

    /// The token kind, as a symbol from the `token_kind` vocabulary.
    pub fn kind(&self) -> EnumSymbol {
        TOKEN_KIND.symbol(self.engine().token_kind(self.raw))
    }

    pub fn spelling(&self) -> String {
        self.engine().token_spelling(self.set.unit.raw(), self.raw)
    }

    pub fn location(&self) -> SourceLocation<'a> {
        SourceLocation::from_raw_or_null(
            self.set.unit,
            self.engine().token_location(self.set.unit.raw(), self.raw),
        )
    }

    pub fn extent(&self) -> SourceRange<'a> {
        SourceRange::from_raw(
            self.set.unit,
            self.engine().token_extent(self.set.unit.raw(), self.raw),
        )
    }
}

impl std::fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind().to_string())
            .field("spelling", &self.spelling())
            .finish()
    }
}
