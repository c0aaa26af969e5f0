//! Opaque raw payloads exchanged across the engine boundary.
//!
//! Two shapes exist, mirroring the foreign API: value records that the engine
//! returns by copy (cursors, types, locations, ranges, tokens) and opaque
//! pointer-like ids for heap objects the engine owns (indexes, units,
//! diagnostics). All are plain `Copy` data; validity is governed entirely by
//! the owning handle on the host side.

macro_rules! raw_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub u64);

        impl $name {
            pub const NULL: Self = Self(0);

            pub fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    };
}

raw_id!(
    /// An engine-side index: shared context for translation units.
    RawIndex
);
raw_id!(
    /// An engine-side translation unit.
    RawUnit
);
raw_id!(
    /// An engine-side diagnostic object.
    RawDiagnostic
);
raw_id!(
    /// An engine-side diagnostic set.
    RawDiagnosticSet
);
raw_id!(
    /// A file known to a translation unit.
    RawFile
);
raw_id!(
    /// A module associated with a translation unit.
    RawModule
);
raw_id!(
    /// A foreign-owned token array produced by one tokenize call.
    RawTokenArray
);
raw_id!(
    /// An engine-side code-completion result set.
    RawCompletionResults
);
raw_id!(
    /// A completion string view inside a result set.
    RawCompletionString
);
raw_id!(
    /// A virtual file overlay descriptor.
    RawOverlay
);
raw_id!(
    /// A module map descriptor.
    RawModuleMap
);
raw_id!(
    /// A remapping loaded from metadata.
    RawRemapping
);
raw_id!(
    /// A printing policy object.
    RawPolicy
);

/// A value-copied cursor record: kind plus opaque engine words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawCursor {
    pub kind: u32,
    pub data: [u64; 3],
}

impl RawCursor {
    /// The null cursor: invalid kind, zeroed payload.
    pub const NULL: Self = Self {
        kind: 70, // invalid_file
        data: [0; 3],
    };

    pub fn is_null(self) -> bool {
        self.data == [0; 3]
    }
}

/// A value-copied type record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawType {
    pub kind: u32,
    pub data: [u64; 2],
}

impl RawType {
    pub const INVALID: Self = Self { kind: 0, data: [0; 2] };

    pub fn is_invalid(self) -> bool {
        self.kind == 0
    }
}

/// A value-copied source location record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawLocation {
    pub data: [u64; 3],
}

impl RawLocation {
    pub const NULL: Self = Self { data: [0; 3] };

    pub fn is_null(self) -> bool {
        self.data == [0; 3]
    }
}

/// A value-copied source range record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawRange {
    pub start: RawLocation,
    pub end: RawLocation,
}

impl RawRange {
    pub const NULL: Self = Self {
        start: RawLocation::NULL,
        end: RawLocation::NULL,
    };

    pub fn is_null(self) -> bool {
        self.start.is_null() && self.end.is_null()
    }
}

/// A value-copied token record. Only meaningful while the owning token
/// array is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawToken {
    pub data: [u64; 4],
}

/// A value-copied documentation-comment node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawComment {
    pub kind: u32,
    pub data: [u64; 2],
}

impl RawComment {
    /// The null comment node (kind `null`).
    pub const NULL: Self = Self { kind: 0, data: [0; 2] };

    pub fn is_null(self) -> bool {
        self.kind == 0
    }
}
