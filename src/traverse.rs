//! Traversal control vocabularies.
//!
//! The engine defines two distinct traversal primitives: general child
//! visitation with three outcomes, and narrower field/reference visitation
//! with two. Both vocabularies go through the enum registry when crossing
//! the boundary, so the layer stays honest about what the integer codes mean.
//!
//! A traversal moves `Pending -> Visiting -> { next sibling | first child |
//! Terminated }` and finishes in one of two terminal states, reported as
//! [`Traversal`]. Returning [`ChildVisit::Break`] at any depth unwinds the
//! entire walk immediately; side effects applied before the callback returned
//! are kept, nothing is buffered.

use crate::registry::tables::{CHILD_VISIT_RESULT, VISITOR_RESULT};

/// Outcome of a general child-visitor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildVisit {
    /// Terminate the traversal.
    Break,
    /// Continue with the next sibling, skipping this node's children.
    Continue,
    /// Continue with this node's children.
    Recurse,
}

impl ChildVisit {
    fn name(self) -> &'static str {
        match self {
            ChildVisit::Break => "break",
            ChildVisit::Continue => "continue",
            ChildVisit::Recurse => "recurse",
        }
    }

    /// Encode for the engine via the `child_visit_result` vocabulary.
    pub fn code(self) -> u32 {
        CHILD_VISIT_RESULT.code(self.name())
    }

    /// Decode an engine code. Unregistered codes decode to `Break`: a
    /// malformed result must not silently keep traversing.
    pub fn from_code(code: u32) -> Self {
        match CHILD_VISIT_RESULT.symbol(code).name() {
            Some("continue") => ChildVisit::Continue,
            Some("recurse") => ChildVisit::Recurse,
            _ => ChildVisit::Break,
        }
    }
}

/// Outcome of a field-visitor or reference-finder callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    Break,
    Continue,
}

impl VisitResult {
    fn name(self) -> &'static str {
        match self {
            VisitResult::Break => "break",
            VisitResult::Continue => "continue",
        }
    }

    /// Encode for the engine via the `visitor_result` vocabulary.
    pub fn code(self) -> u32 {
        VISITOR_RESULT.code(self.name())
    }

    /// Decode an engine code. Here `Break` is the only explicit signal, so
    /// unregistered codes decode to `Continue`.
    pub fn from_code(code: u32) -> Self {
        match VISITOR_RESULT.symbol(code).name() {
            Some("break") => VisitResult::Break,
            _ => VisitResult::Continue,
        }
    }
}

/// Terminal state of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// The walk visited every reachable node.
    Done,
    /// A callback returned `Break` and the walk unwound early.
    Terminated,
}

impl Traversal {
    pub fn terminated_early(self) -> bool {
        self == Traversal::Terminated
    }

    pub(crate) fn from_broke(broke: bool) -> Self {
        if broke { Traversal::Terminated } else { Traversal::Done }
    }
}
