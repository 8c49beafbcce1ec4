//! The six-state nested hierarchy used throughout Miro Samek's UML
//! statechart examples: S0 contains S1 and S2, S1 contains S11, S2 contains
//! S21, and S21 contains S211. Reused both by this crate's own tests and by
//! the `demos` crate, so the same fixture backs both.
//!
//! ```text
//!        S0
//!       /  \
//!     S1    S2
//!     |      |
//!    S11    S21
//!            |
//!           S211
//! ```
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::delegate::MachineDelegate;
use crate::errors::HSMResult;
use crate::logger::HSMLogger;
use crate::machine::StateMachine;
use crate::signal::Signal;
use crate::state::{HandlerFn, Outcome, StateHandler, StateMembership};

/// The eight application signals the fixture's states react to, matching
/// the offsets `SM_A` through `SM_H` fed into the original state machine.
pub mod signals {
    use crate::signal::Signal;

    pub const A: Signal = Signal::user(0);
    pub const B: Signal = Signal::user(1);
    pub const C: Signal = Signal::user(2);
    pub const D: Signal = Signal::user(3);
    pub const E: Signal = Signal::user(4);
    pub const F: Signal = Signal::user(5);
    pub const G: Signal = Signal::user(6);
    pub const H: Signal = Signal::user(7);
}

/// Owner context for the fixture: holds the machine that drives it, a
/// recorder of every action token each handler emits (mirroring the
/// original's `printf` trace), and the one piece of state (`foo`) whose
/// value one state's handling of `H` depends on.
pub struct Tester {
    self_weak: RefCell<Weak<Tester>>,
    machine: RefCell<Option<Rc<StateMachine<Tester>>>>,
    trace: RefCell<Vec<String>>,
    foo: RefCell<bool>,
}

impl Tester {
    pub fn new(logger: HSMLogger) -> Rc<Self> {
        let tester = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            machine: RefCell::new(None),
            trace: RefCell::new(Vec::new()),
            foo: RefCell::new(false),
        });
        *tester.self_weak.borrow_mut() = Rc::downgrade(&tester);
        *tester.machine.borrow_mut() = Some(Rc::new(StateMachine::new(logger)));
        tester
    }

    /// Opens into S0, running the full entry/init cascade down to S11.
    pub fn open(self: &Rc<Self>) -> HSMResult<()> {
        self.machine().open(self.handle(s0, "S0"))
    }

    pub fn dispatch(self: &Rc<Self>, signal: Signal) -> HSMResult<bool> {
        self.machine().dispatch(signal)
    }

    pub fn current(self: &Rc<Self>) -> Option<StateHandler<Tester>> {
        self.machine().current()
    }

    /// Action tokens recorded so far, in emission order.
    pub fn trace(&self) -> Vec<String> {
        self.trace.borrow().clone()
    }

    pub fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }

    fn record(&self, token: &str) {
        self.trace.borrow_mut().push(token.to_string());
    }

    fn owner(&self) -> Rc<Tester> {
        self.self_weak.borrow().upgrade().expect("Tester outlives its own handles")
    }

    fn machine(&self) -> Rc<StateMachine<Tester>> {
        Rc::clone(self.machine.borrow().as_ref().expect("Tester::new always sets a machine"))
    }

    fn handle(&self, f: HandlerFn<Tester>, name: &'static str) -> StateHandler<Tester> {
        StateHandler::new(self.owner(), f, name)
    }
}

fn s0(t: &Tester, e: Signal) -> Outcome<Tester> {
    match e {
        Signal::INIT => {
            t.record("S0-INIT");
            t.machine().initializer(t.handle(s1, "S1"));
            Outcome::Handled
        }
        Signal::ENTRY => {
            t.record("S0-ENTRY");
            Outcome::Handled
        }
        Signal::EXIT => {
            t.record("S0-EXIT");
            Outcome::Handled
        }
        _ if e == signals::E => {
            t.record("S0-E");
            t.machine().transition(t.handle(s211, "S211"));
            Outcome::Handled
        }
        _ => Outcome::Top,
    }
}

fn s1(t: &Tester, e: Signal) -> Outcome<Tester> {
    match e {
        Signal::INIT => {
            t.record("S1-INIT");
            t.machine().initializer(t.handle(s11, "S11"));
            Outcome::Handled
        }
        Signal::ENTRY => {
            t.record("S1-ENTRY");
            Outcome::Handled
        }
        Signal::EXIT => {
            t.record("S1-EXIT");
            Outcome::Handled
        }
        _ if e == signals::A => {
            t.record("S1-A");
            t.machine().transition(t.handle(s1, "S1"));
            Outcome::Handled
        }
        _ if e == signals::B => {
            t.record("S1-B");
            t.machine().transition(t.handle(s11, "S11"));
            Outcome::Handled
        }
        _ if e == signals::C => {
            t.record("S1-C");
            t.machine().transition(t.handle(s2, "S2"));
            Outcome::Handled
        }
        _ if e == signals::D => {
            t.record("S1-D");
            t.machine().transition(t.handle(s0, "S0"));
            Outcome::Handled
        }
        _ if e == signals::F => {
            t.record("S1-F");
            t.machine().transition(t.handle(s211, "S211"));
            Outcome::Handled
        }
        _ => Outcome::Parent(t.handle(s0, "S0")),
    }
}

fn s11(t: &Tester, e: Signal) -> Outcome<Tester> {
    match e {
        Signal::ENTRY => {
            t.record("S11-ENTRY");
            Outcome::Handled
        }
        Signal::EXIT => {
            t.record("S11-EXIT");
            Outcome::Handled
        }
        _ if e == signals::G => {
            t.record("S11-G");
            t.machine().transition(t.handle(s211, "S211"));
            Outcome::Handled
        }
        _ if e == signals::H => {
            if *t.foo.borrow() {
                t.record("S11-H");
                *t.foo.borrow_mut() = false;
            }
            Outcome::Handled
        }
        _ => Outcome::Parent(t.handle(s1, "S1")),
    }
}

fn s2(t: &Tester, e: Signal) -> Outcome<Tester> {
    match e {
        Signal::INIT => {
            t.record("S2-INIT");
            t.machine().initializer(t.handle(s21, "S21"));
            Outcome::Handled
        }
        Signal::ENTRY => {
            t.record("S2-ENTRY");
            Outcome::Handled
        }
        Signal::EXIT => {
            t.record("S2-EXIT");
            Outcome::Handled
        }
        _ if e == signals::C => {
            t.record("S2-C");
            t.machine().transition(t.handle(s1, "S1"));
            Outcome::Handled
        }
        _ if e == signals::F => {
            t.record("S2-F");
            t.machine().transition(t.handle(s11, "S11"));
            Outcome::Handled
        }
        _ => Outcome::Parent(t.handle(s0, "S0")),
    }
}

fn s21(t: &Tester, e: Signal) -> Outcome<Tester> {
    match e {
        Signal::INIT => {
            t.record("S21-INIT");
            t.machine().initializer(t.handle(s211, "S211"));
            Outcome::Handled
        }
        Signal::ENTRY => {
            t.record("S21-ENTRY");
            Outcome::Handled
        }
        Signal::EXIT => {
            t.record("S21-EXIT");
            Outcome::Handled
        }
        _ if e == signals::B => {
            t.record("S21-B");
            t.machine().transition(t.handle(s211, "S211"));
            Outcome::Handled
        }
        _ if e == signals::H => {
            if !*t.foo.borrow() {
                t.record("S21-H");
                *t.foo.borrow_mut() = true;
            }
            Outcome::Handled
        }
        _ => Outcome::Parent(t.handle(s2, "S2")),
    }
}

fn s211(t: &Tester, e: Signal) -> Outcome<Tester> {
    match e {
        Signal::ENTRY => {
            t.record("S211-ENTRY");
            Outcome::Handled
        }
        Signal::EXIT => {
            t.record("S211-EXIT");
            Outcome::Handled
        }
        _ if e == signals::D => {
            t.record("S211-D");
            t.machine().transition(t.handle(s21, "S21"));
            Outcome::Handled
        }
        _ if e == signals::G => {
            t.record("S211-G");
            t.machine().transition(t.handle(s0, "S0"));
            Outcome::Handled
        }
        _ => Outcome::Parent(t.handle(s21, "S21")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    fn opened() -> Rc<Tester> {
        let tester = Tester::new(HSMLogger::new(LevelFilter::Off));
        tester.open().unwrap();
        tester
    }

    #[test]
    fn open_enters_down_to_s11() {
        let tester = opened();
        assert_eq!(
            tester.trace(),
            vec!["S0-ENTRY", "S0-INIT", "S1-ENTRY", "S1-INIT", "S11-ENTRY"]
        );
        assert!(tester.current().unwrap() == tester.handle(s11, "S11"));
    }

    #[test]
    fn scenario_a_is_a_self_transition_on_s1() {
        let tester = opened();
        tester.clear_trace();
        tester.dispatch(signals::A).unwrap();
        assert_eq!(
            tester.trace(),
            vec!["S1-A", "S11-EXIT", "S1-EXIT", "S1-ENTRY", "S1-INIT", "S11-ENTRY"]
        );
    }

    #[test]
    fn scenario_c_crosses_to_the_sibling_branch() {
        let tester = opened();
        tester.clear_trace();
        tester.dispatch(signals::C).unwrap();
        assert_eq!(
            tester.trace(),
            vec![
                "S1-C", "S11-EXIT", "S1-EXIT", "S2-ENTRY", "S2-INIT", "S21-ENTRY", "S21-INIT",
                "S211-ENTRY"
            ]
        );
    }

    #[test]
    fn scenario_d_targets_an_ancestor_of_the_pitcher() {
        let tester = opened();
        tester.clear_trace();
        tester.dispatch(signals::D).unwrap();
        assert_eq!(
            tester.trace(),
            vec![
                "S1-D", "S11-EXIT", "S1-EXIT", "S0-INIT", "S1-ENTRY", "S1-INIT", "S11-ENTRY"
            ]
        );
    }

    #[test]
    fn scenario_e_bubbles_to_the_root_before_targeting_a_deep_state() {
        let tester = opened();
        tester.clear_trace();
        tester.dispatch(signals::E).unwrap();
        assert_eq!(
            tester.trace(),
            vec!["S0-E", "S11-EXIT", "S1-EXIT", "S2-ENTRY", "S21-ENTRY", "S211-ENTRY"]
        );
    }

    #[test]
    fn scenario_g_then_h_exercises_the_foo_latch() {
        let tester = opened();
        tester.dispatch(signals::C).unwrap(); // S0/S1/S11 -> S2/S21/S211
        tester.clear_trace();
        // H while foo is false: S211 bubbles to S21, which sets foo and
        // reports the handled signal without the guarded branch firing.
        tester.dispatch(signals::H).unwrap();
        assert_eq!(tester.trace(), vec!["S21-H"]);

        tester.clear_trace();
        tester.dispatch(signals::G).unwrap();
        assert_eq!(tester.trace(), vec!["S211-G", "S211-EXIT", "S21-EXIT", "S2-EXIT", "S0-INIT", "S1-ENTRY", "S1-INIT", "S11-ENTRY"]);

        tester.clear_trace();
        // H while foo is true: S211 bubbles to S21 (no match there since foo
        // is already set) and on to S11, which resets the latch.
        tester.dispatch(signals::H).unwrap();
        assert_eq!(tester.trace(), vec!["S11-H"]);
    }

    #[test]
    fn scenario_b_transitions_into_its_own_pitchers_child() {
        let tester = opened();
        tester.clear_trace();
        tester.dispatch(signals::B).unwrap();
        assert_eq!(tester.trace(), vec!["S1-B", "S11-EXIT", "S11-ENTRY"]);
    }

    #[test]
    fn scenario_f_crosses_branches_in_both_directions() {
        let tester = opened();
        tester.clear_trace();
        tester.dispatch(signals::F).unwrap();
        assert_eq!(
            tester.trace(),
            vec!["S1-F", "S11-EXIT", "S1-EXIT", "S2-ENTRY", "S21-ENTRY", "S211-ENTRY"]
        );

        tester.clear_trace();
        tester.dispatch(signals::F).unwrap();
        assert_eq!(
            tester.trace(),
            vec!["S2-F", "S211-EXIT", "S21-EXIT", "S2-EXIT", "S1-ENTRY", "S11-ENTRY"]
        );
    }

    #[test]
    fn unhandled_signal_bubbles_to_top_and_reports_false() {
        let tester = opened();
        let handled = tester.dispatch(Signal::user(100)).unwrap();
        assert!(!handled);
    }

    #[test]
    fn is_in_state_sees_every_active_ancestor() {
        let tester = opened();
        assert_eq!(
            tester.machine().is_in_state(&tester.handle(s11, "S11")).unwrap(),
            StateMembership::Active
        );
        assert_eq!(
            tester.machine().is_in_state(&tester.handle(s1, "S1")).unwrap(),
            StateMembership::Ancestor
        );
        assert_eq!(
            tester.machine().is_in_state(&tester.handle(s0, "S0")).unwrap(),
            StateMembership::Ancestor
        );
        assert_eq!(
            tester.machine().is_in_state(&tester.handle(s2, "S2")).unwrap(),
            StateMembership::NotActive
        );
    }
}
