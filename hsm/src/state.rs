//! This file contains the logic for an individual state and how handlers
//! are bound to the context (owner) they act on.
use std::fmt;
use std::rc::Rc;

use crate::signal::Signal;

/// What a state's handler function reports back to the dispatcher.
///
/// The original encoding (Samek-style C) has a handler return its own
/// carrier type, using two process-wide sentinel values (`HANDLED`, `TOP`)
/// to fold three distinct meanings into one type. Made explicit here as a
/// sum type: there is no runtime sentinel object to construct or compare,
/// only these three tags.
pub enum Outcome<Ctx> {
    /// The signal was consumed here (including reserved ENTRY/EXIT/INIT
    /// reactions, or INQUIRE, or a user signal the state elected to handle).
    Handled,
    /// The signal was not recognized; bubble up to this parent state.
    Parent(StateHandler<Ctx>),
    /// Not recognized, and there is no enclosing parent.
    Top,
}

impl<Ctx> fmt::Debug for Outcome<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Handled => write!(f, "Handled"),
            Outcome::Parent(p) => write!(f, "Parent({})", p.name()),
            Outcome::Top => write!(f, "Top"),
        }
    }
}

/// A state's reaction function: given the owner and a signal, report how it
/// was handled.
pub type HandlerFn<Ctx> = fn(&Ctx, Signal) -> Outcome<Ctx>;

/// Result of `StateMachine::is_in_state`: whether a queried state is the
/// active leaf, a proper active ancestor of it, or not active at all.
/// Carries the same 2/1/0 values the original `isInState` returns, so a
/// caller that wants the raw integer can still get one via `as i32`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StateMembership {
    NotActive = 0,
    Ancestor = 1,
    Active = 2,
}

impl StateMembership {
    /// Either variant means `s` is somewhere on the active chain.
    pub const fn is_in_state(&self) -> bool {
        !matches!(self, StateMembership::NotActive)
    }
}

impl From<StateMembership> for i32 {
    fn from(m: StateMembership) -> i32 {
        m as i32
    }
}

/// A callable binding an owner context with a handler function.
///
/// Equality is by identity of both the owner (`Rc::ptr_eq`) and the handler
/// function (pointer equality) -- never by the value the owner happens to
/// hold, per the identity contract handlers must satisfy.
pub struct StateHandler<Ctx> {
    owner: Rc<Ctx>,
    handler: HandlerFn<Ctx>,
    name: &'static str,
}

impl<Ctx> StateHandler<Ctx> {
    pub fn new(owner: Rc<Ctx>, handler: HandlerFn<Ctx>, name: &'static str) -> Self {
        Self {
            owner,
            handler,
            name,
        }
    }

    /// Calls the handler function with the bound owner and the signal.
    pub fn invoke(&self, signal: Signal) -> Outcome<Ctx> {
        (self.handler)(&self.owner, signal)
    }

    /// Name used purely for diagnostics (logging, error messages, the demo's
    /// action trace); the dispatch algorithm never branches on it.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn owner(&self) -> &Rc<Ctx> {
        &self.owner
    }
}

impl<Ctx> Clone for StateHandler<Ctx> {
    fn clone(&self) -> Self {
        Self {
            owner: Rc::clone(&self.owner),
            handler: self.handler,
            name: self.name,
        }
    }
}

impl<Ctx> PartialEq for StateHandler<Ctx> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.owner, &other.owner) && self.handler as usize == other.handler as usize
    }
}

impl<Ctx> Eq for StateHandler<Ctx> {}

impl<Ctx> fmt::Debug for StateHandler<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StateHandler({})", self.name)
    }
}

impl<Ctx> fmt::Display for StateHandler<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    fn h_a(_: &Dummy, _: Signal) -> Outcome<Dummy> {
        Outcome::Handled
    }

    fn h_b(_: &Dummy, _: Signal) -> Outcome<Dummy> {
        Outcome::Handled
    }

    #[test]
    fn equal_owner_and_function_are_equal() {
        let owner = Rc::new(Dummy);
        let a1 = StateHandler::new(Rc::clone(&owner), h_a, "A");
        let a2 = StateHandler::new(Rc::clone(&owner), h_a, "A");
        assert_eq!(a1, a2);
    }

    #[test]
    fn different_function_same_owner_are_distinct() {
        let owner = Rc::new(Dummy);
        let a = StateHandler::new(Rc::clone(&owner), h_a, "A");
        let b = StateHandler::new(Rc::clone(&owner), h_b, "B");
        assert_ne!(a, b);
    }

    #[test]
    fn same_function_different_owner_are_distinct() {
        let owner1 = Rc::new(Dummy);
        let owner2 = Rc::new(Dummy);
        let a1 = StateHandler::new(owner1, h_a, "A");
        let a2 = StateHandler::new(owner2, h_a, "A");
        assert_ne!(a1, a2);
    }

    #[test]
    fn invoke_dispatches_to_bound_function() {
        let owner = Rc::new(Dummy);
        let a = StateHandler::new(owner, h_a, "A");
        assert!(matches!(a.invoke(Signal::ENTRY), Outcome::Handled));
    }
}
