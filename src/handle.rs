//! Disposal guard shared by every owned handle.
//!
//! A foreign object is either owned (its disposal function must run exactly
//! once when the handle goes away) or a view into memory owned by something
//! else (no disposal call may ever run). The guard carries that policy as an
//! optional disposer; `Drop` makes the exactly-once guarantee, and reading
//! the payload requires borrowing the guard, which keeps the owner alive for
//! the duration of the call.

use crate::engine::{Engine, EngineRef};

/// Disposal function for a payload of type `P`.
pub(crate) type Disposer<P> = fn(&dyn Engine, P);

/// One foreign payload plus its disposal policy and engine handle.
pub(crate) struct Owned<P: Copy> {
    engine: EngineRef,
    payload: P,
    disposer: Option<Disposer<P>>,
}

impl<P: Copy> Owned<P> {
    /// Wrap a payload whose disposal this handle now owns.
    pub(crate) fn adopt(engine: EngineRef, payload: P, disposer: Disposer<P>) -> Self {
        Self {
            engine,
            payload,
            disposer: Some(disposer),
        }
    }

    /// Wrap a payload owned elsewhere. No disposal call will ever run.
    pub(crate) fn view(engine: EngineRef, payload: P) -> Self {
        Self {
            engine,
            payload,
            disposer: None,
        }
    }

    pub(crate) fn payload(&self) -> P {
        self.payload
    }

    pub(crate) fn engine(&self) -> &dyn Engine {
        &*self.engine
    }

    pub(crate) fn engine_ref(&self) -> &EngineRef {
        &self.engine
    }
}

impl<P: Copy> Drop for Owned<P> {
    fn drop(&mut self) {
        if let Some(dispose) = self.disposer.take() {
            dispose(&*self.engine, self.payload);
        }
    }
}
