//! Source locations, ranges, and files.

use crate::engine::{Engine, RawFile, RawLocation, RawRange};
use crate::unit::TranslationUnit;

/// A file known to a translation unit. A non-owned view: the unit owns the
/// underlying file table.
#[derive(Clone, Copy)]
pub struct File<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawFile,
}

impl<'tu> File<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawFile) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { unit, raw })
        }
    }

    pub(crate) fn raw(&self) -> RawFile {
        self.raw
    }

    pub fn name(&self) -> String {
        self.unit.engine().file_name(self.raw)
    }

    /// The buffered contents of the file, if the unit still holds them.
    pub fn contents(&self) -> Option<String> {
        self.unit.engine().file_contents(self.unit.raw(), self.raw)
    }
}

impl PartialEq for File<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl std::fmt::Debug for File<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("File").field(&self.name()).finish()
    }
}

/// A single point in a source file.
#[derive(Clone, Copy)]
pub struct SourceLocation<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawLocation,
}

impl<'tu> SourceLocation<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawLocation) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { unit, raw })
        }
    }

    /// Like [`Self::from_raw`] but keeps the null location as a value, for
    /// call sites that must always hand back a location.
    pub(crate) fn from_raw_or_null(unit: &'tu TranslationUnit, raw: RawLocation) -> Self {
        Self { unit, raw }
    }

    pub(crate) fn raw(&self) -> RawLocation {
        self.raw
    }

    fn engine(&self) -> &'tu dyn Engine {
        self.unit.engine()
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// Decompose into `(file, line, column, offset)`. Lines and columns are
    /// 1-based, the offset is a byte offset into the file.
    pub fn parts(&self) -> (Option<File<'tu>>, u32, u32, u32) {
        let (file, line, column, offset) = self.engine().location_parts(self.raw);
        (File::from_raw(self.unit, file), line, column, offset)
    }

    pub fn file(&self) -> Option<File<'tu>> {
        self.parts().0
    }

    pub fn line(&self) -> u32 {
        self.parts().1
    }

    pub fn column(&self) -> u32 {
        self.parts().2
    }

    pub fn offset(&self) -> u32 {
        self.parts().3
    }
}

impl PartialEq for SourceLocation<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl std::fmt::Debug for SourceLocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (file, line, column, _) = self.parts();
        write!(
            f,
            "{}:{line}:{column}",
            file.map(|f| f.name()).unwrap_or_default()
        )
    }
}

/// A half-open span between two locations in a source file.
#[derive(Clone, Copy)]
pub struct SourceRange<'tu> {
    unit: &'tu TranslationUnit,
    raw: RawRange,
}

impl<'tu> SourceRange<'tu> {
    pub(crate) fn from_raw(unit: &'tu TranslationUnit, raw: RawRange) -> Self {
        Self { unit, raw }
    }

    /// Build a range between two locations of the same unit.
    pub fn new(start: SourceLocation<'tu>, end: SourceLocation<'tu>) -> Self {
        let raw = start.unit.engine().range(start.raw, end.raw);
        Self {
            unit: start.unit,
            raw,
        }
    }

    pub(crate) fn raw(&self) -> RawRange {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    pub fn start(&self) -> SourceLocation<'tu> {
        SourceLocation::from_raw_or_null(self.unit, self.raw.start)
    }

    pub fn end(&self) -> SourceLocation<'tu> {
        SourceLocation::from_raw_or_null(self.unit, self.raw.end)
    }
}

impl PartialEq for SourceRange<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl std::fmt::Debug for SourceRange<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start(), self.end())
    }
}
