//! A small bounded container used during `dispatch` to record the chain of
//! target ancestors walked while looking for the least common ancestor.
//! Bounded depth is a deliberate design choice for embedded use: no heap
//! growth on the dispatch hot path beyond the initial allocation.
use crate::errors::{HSMError, HSMResult};
use crate::state::StateHandler;

/// Compile-time bound on hierarchy nesting. Raise with the
/// `deep-hierarchies` feature for hierarchies deeper than the default
/// allows.
#[cfg(not(feature = "deep-hierarchies"))]
pub const STATEMACHINE_MAX_DEPTH: usize = 20;
#[cfg(feature = "deep-hierarchies")]
pub const STATEMACHINE_MAX_DEPTH: usize = 64;

/// LIFO buffer of `StateHandler` values, replayed in reverse push order
/// (outermost-needed ancestor first, target last) to produce the correct
/// entry sequence.
pub(crate) struct PathBuffer<Ctx> {
    entries: Vec<StateHandler<Ctx>>,
}

impl<Ctx> PathBuffer<Ctx> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::with_capacity(STATEMACHINE_MAX_DEPTH),
        }
    }

    pub(crate) fn init(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn push(&mut self, s: StateHandler<Ctx>) -> HSMResult<()> {
        if self.entries.len() >= STATEMACHINE_MAX_DEPTH {
            return Err(HSMError::DepthExceeded(STATEMACHINE_MAX_DEPTH));
        }
        self.entries.push(s);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<StateHandler<Ctx>> {
        self.entries.pop()
    }

    /// 1-based position from the most-recently-pushed end, or 0 if absent.
    /// Position 1 means "last pushed".
    pub(crate) fn contains(&self, s: &StateHandler<Ctx>) -> usize {
        for (offset, entry) in self.entries.iter().rev().enumerate() {
            if entry == s {
                return offset + 1;
            }
        }
        0
    }

    /// Remove the `n` most-recently-pushed elements.
    pub(crate) fn drop_first_n(&mut self, n: usize) {
        let keep = self.entries.len().saturating_sub(n);
        self.entries.truncate(keep);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
