//! Bidirectional mapping between symbolic tags and unsigned integer codes.
//!
//! The foreign engine exposes dozens of independent enumerations as plain
//! integers with no reflection. A single generic, data-driven table keeps the
//! mapping mechanical and forward-compatible: codes added by newer engine
//! versions degrade to raw numbers instead of failing.
//!
//! Tables are built once at startup from static data and never mutated.

use indexmap::IndexMap;
use smol_str::SmolStr;
use std::fmt;

pub mod tables;

/// A symbol looked up by code.
///
/// Unknown codes are not an error: they surface as [`EnumSymbol::Raw`] so the
/// layer degrades gracefully against newer engine versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumSymbol {
    Named(SmolStr),
    Raw(u32),
}

impl EnumSymbol {
    /// The symbol name, or `None` for an unregistered raw code.
    pub fn name(&self) -> Option<&str> {
        match self {
            EnumSymbol::Named(s) => Some(s),
            EnumSymbol::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, EnumSymbol::Raw(_))
    }
}

impl fmt::Display for EnumSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumSymbol::Named(s) => f.write_str(s),
            EnumSymbol::Raw(v) => write!(f, "{v}"),
        }
    }
}

impl PartialEq<&str> for EnumSymbol {
    fn eq(&self, other: &&str) -> bool {
        self.name() == Some(*other)
    }
}

/// A named, immutable mapping between symbols and unsigned integer codes.
///
/// Symbols are unique within a table; codes need not be unique when the table
/// represents a bitflag set (powers of two plus convenience codes).
/// Registration order is preserved and governs reverse lookup and
/// [`EnumTable::unmask`] output.
#[derive(Debug, Clone)]
pub struct EnumTable {
    name: &'static str,
    entries: IndexMap<SmolStr, u32>,
}

impl EnumTable {
    /// Build a table from a static symbol/code list. Initialization-time only.
    pub fn new(name: &'static str, fields: &[(&str, u32)]) -> Self {
        let mut entries = IndexMap::with_capacity(fields.len());
        for (symbol, code) in fields {
            let prev = entries.insert(SmolStr::new(*symbol), *code);
            debug_assert!(prev.is_none(), "duplicate symbol {symbol} in {name}");
        }
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate symbol/code pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// The integral code of `symbol`. Returns `0` for unknown symbols,
    /// never fails.
    pub fn code(&self, symbol: &str) -> u32 {
        self.entries.get(symbol).copied().unwrap_or(0)
    }

    /// Whether `symbol` is registered in this table.
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// The symbol registered for `code`: first exact match in registration
    /// order, or the raw code when nothing matches.
    pub fn symbol(&self, code: u32) -> EnumSymbol {
        for (sym, c) in &self.entries {
            if *c == code {
                return EnumSymbol::Named(sym.clone());
            }
        }
        EnumSymbol::Raw(code)
    }

    /// OR together the codes of every resolvable symbol, silently skipping
    /// unresolvable entries.
    pub fn mask<I, S>(&self, symbols: I) -> u32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = 0;
        for sym in symbols {
            if let Some(code) = self.entries.get(sym.as_ref()) {
                mask |= code;
            }
        }
        mask
    }

    /// Every registered symbol whose code ANDs non-zero with `mask`, in
    /// registration order. Zero-valued convenience codes are never produced.
    pub fn unmask(&self, mask: u32) -> Vec<SmolStr> {
        self.entries
            .iter()
            .filter(|(_, c)| *c & mask != 0)
            .map(|(s, _)| s.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> EnumTable {
        EnumTable::new(
            "test_flags",
            &[("none", 0), ("alpha", 1), ("beta", 2), ("gamma", 4), ("all", 7)],
        )
    }

    #[test]
    fn test_code_lookup() {
        let t = flags();
        assert_eq!(t.code("beta"), 2);
        assert_eq!(t.code("missing"), 0);
    }

    #[test]
    fn test_symbol_round_trip() {
        let t = flags();
        for (name, _) in t.iter().collect::<Vec<_>>() {
            let sym = t.symbol(t.code(name));
            // "none" shares code 0 with unknown lookups but resolves to the
            // first zero-coded entry, which is itself.
            assert_eq!(sym, name);
        }
    }

    #[test]
    fn test_unknown_code_degrades_to_raw() {
        let t = flags();
        assert_eq!(t.symbol(64), EnumSymbol::Raw(64));
        assert_eq!(t.symbol(64).to_string(), "64");
    }

    #[test]
    fn test_mask_skips_unresolvable() {
        let t = flags();
        assert_eq!(t.mask(["alpha", "nope", "gamma"]), 5);
        assert_eq!(t.mask(Vec::<&str>::new()), 0);
    }

    #[test]
    fn test_unmask_registration_order() {
        let t = flags();
        let syms = t.unmask(6);
        // "all" overlaps too: overlapping bitflags may yield convenience codes.
        assert_eq!(syms, vec!["beta", "gamma", "all"]);
    }

    #[test]
    fn test_unmask_zero_excludes_none() {
        let t = flags();
        assert!(t.unmask(0).is_empty());
    }

    #[test]
    fn test_unmask_superset_and_remask_fixpoint() {
        let t = flags();
        let m = t.mask(["alpha", "gamma"]);
        let syms = t.unmask(m);
        for want in ["alpha", "gamma"] {
            assert!(syms.iter().any(|s| s == want));
        }
        // Overlapping convenience codes may join the decomposition, but
        // re-masking reaches a fixpoint after one round.
        let m2 = t.mask(&syms);
        assert_eq!(t.mask(t.unmask(m2)), m2);
    }
}
