//! Code-completion result sets and their views.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::engine::{Engine, RawCompletionResults, RawCompletionString};
use crate::handle::Owned;
use crate::registry::EnumSymbol;
use crate::registry::tables::{COMPLETION_CHUNK_KIND, CURSOR_KIND};
use crate::unit::TranslationUnit;

fn dispose_results(engine: &dyn Engine, results: RawCompletionResults) {
    engine.dispose_completion_results(results);
}

/// Results of one code-completion request. Owns the engine-side result set;
/// [`CompletionString`]s are views borrowing it.
pub struct CodeCompleteResults<'tu> {
    handle: Owned<RawCompletionResults>,
    _unit: PhantomData<&'tu TranslationUnit>,
}

impl<'tu> CodeCompleteResults<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawCompletionResults) -> Option<Self> {
        if raw.is_null() {
            return None;
        }
        Some(Self {
            handle: Owned::adopt(Rc::clone(unit.engine_ref()), raw, dispose_results),
            _unit: PhantomData,
        })
    }

    fn engine(&self) -> &dyn Engine {
        self.handle.engine()
    }

    pub fn len(&self) -> u32 {
        self.engine().completion_result_count(self.handle.payload())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind of the entity the result completes to, from the `cursor_kind`
    /// vocabulary.
    pub fn result_kind(&self, index: u32) -> Option<EnumSymbol> {
        if index >= self.len() {
            return None;
        }
        Some(CURSOR_KIND.symbol(
            self.engine()
                .completion_result_kind(self.handle.payload(), index),
        ))
    }

    pub fn get(&self, index: u32) -> Option<CompletionString<'_>> {
        if index >= self.len() {
            return None;
        }
        Some(CompletionString {
            engine: self.engine(),
            raw: self
                .engine()
                .completion_result_string(self.handle.payload(), index),
            _results: PhantomData,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = CompletionString<'_>> {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// One completion, as a sequence of typed chunks. A view into its result
/// set.
#[derive(Clone, Copy)]
pub struct CompletionString<'r> {
    engine: &'r dyn Engine,
    raw: RawCompletionString,
    _results: PhantomData<&'r CodeCompleteResults<'r>>,
}

impl CompletionString<'_> {
    pub fn chunk_count(&self) -> u32 {
        self.engine.completion_chunk_count(self.raw)
    }

    /// Chunk kind, from the `completion_chunk_kind` vocabulary.
    pub fn chunk_kind(&self, index: u32) -> Option<EnumSymbol> {
        if index >= self.chunk_count() {
            return None;
        }
        Some(COMPLETION_CHUNK_KIND.symbol(self.engine.completion_chunk_kind(self.raw, index)))
    }

    pub fn chunk_text(&self, index: u32) -> Option<String> {
        if index >= self.chunk_count() {
            return None;
        }
        Some(self.engine.completion_chunk_text(self.raw, index))
    }

    /// The text a completion would insert: the concatenated `typed_text`
    /// chunks.
    pub fn typed_text(&self) -> String {
        let mut out = String::new();
        for i in 0..self.chunk_count() {
            if self.chunk_kind(i).is_some_and(|k| k == "typed_text") {
                if let Some(text) = self.chunk_text(i) {
                    out.push_str(&text);
                }
            }
        }
        out
    }
}
