//! The dispatcher itself: owns the active state, runs the entry/exit/init
//! cascades that implement least-common-ancestor transition semantics, and
//! exposes the handful of operations a hosting application drives the
//! machine with (`open`, `dispatch`, `current`, `is_in_state`).
//!
//! A machine is typically held as `Rc<StateMachine<Ctx>>` and handed to every
//! owner `Ctx` as a `Delegate<Ctx>` (`Rc<dyn MachineDelegate<Ctx>>`), which
//! produces an intentional reference cycle: the machine's `current`/`path`
//! hold `StateHandler<Ctx>` values that keep `Ctx` alive, and `Ctx` holds the
//! machine back. Neither side is ever dropped mid-process, so the cycle is
//! never collected -- the same tradeoff the delegate pattern this is
//! grounded on makes.
use std::cell::RefCell;

use crate::delegate::MachineDelegate;
use crate::errors::{HSMError, HSMResult};
use crate::logger::HSMLogger;
use crate::path::{PathBuffer, STATEMACHINE_MAX_DEPTH};
use crate::signal::Signal;
use crate::state::{Outcome, StateHandler, StateMembership};
use crate::utils::get_function_name;

pub struct StateMachine<Ctx> {
    current: RefCell<Option<StateHandler<Ctx>>>,
    pending_init: RefCell<Option<StateHandler<Ctx>>>,
    pending_transition: RefCell<Option<StateHandler<Ctx>>>,
    path: RefCell<PathBuffer<Ctx>>,
    logger: HSMLogger,
}

impl<Ctx> StateMachine<Ctx> {
    pub fn new(logger: HSMLogger) -> Self {
        Self {
            current: RefCell::new(None),
            pending_init: RefCell::new(None),
            pending_transition: RefCell::new(None),
            path: RefCell::new(PathBuffer::new()),
            logger,
        }
    }

    /// Enter `initial` and cascade through its default sub-states until one
    /// declines to nominate a child via `initializer()`. May only be called
    /// once per machine.
    pub fn open(&self, initial: StateHandler<Ctx>) -> HSMResult<()> {
        self.logger
            .log_info(&get_function_name!(), &format!("opening into {}", initial));
        if self.current.borrow().is_some() {
            return Err(HSMError::MachineAlreadyOpen);
        }
        initial.invoke(Signal::ENTRY);
        self.run_init_cascade(initial)
    }

    /// Feed `signal` to the active state, bubbling to ancestors until one
    /// handles it or the hierarchy's root is reached unhandled. Returns
    /// `Ok(true)` if some state on the chain handled the signal (whether or
    /// not that included a transition), `Ok(false)` if it bubbled past the
    /// top unhandled.
    pub fn dispatch(&self, signal: Signal) -> HSMResult<bool> {
        let mut s = self
            .current
            .borrow()
            .clone()
            .ok_or(HSMError::NotOpened)?;
        self.logger.log_trace(
            &get_function_name!(),
            &format!("dispatching {} from {}", signal, s),
        );

        let (pitcher, handled) = {
            let mut steps = 0usize;
            loop {
                match s.invoke(signal) {
                    Outcome::Handled => break (s, true),
                    Outcome::Parent(p) => {
                        s = p;
                        steps += 1;
                        if steps > STATEMACHINE_MAX_DEPTH {
                            return Err(HSMError::ImpossibleTransition(
                                signal.to_string(),
                                "bubbled past STATEMACHINE_MAX_DEPTH without resolving".into(),
                            ));
                        }
                    }
                    Outcome::Top => break (s, false),
                }
            }
        };

        if let Some(target) = self.pending_transition.borrow_mut().take() {
            self.transition_to(&pitcher, &target)?;
        }
        Ok(handled)
    }

    pub fn current(&self) -> Option<StateHandler<Ctx>> {
        self.current.borrow().clone()
    }

    /// `2` if `s` is the active leaf, `1` if `s` is a proper active
    /// ancestor of it (walked via `INQUIRE`), `0` otherwise. The implicit
    /// top of the hierarchy is never itself a candidate.
    pub fn is_in_state(&self, s: &StateHandler<Ctx>) -> HSMResult<StateMembership> {
        let mut cur = self.current.borrow().clone().ok_or(HSMError::NotOpened)?;
        if &cur == s {
            return Ok(StateMembership::Active);
        }
        for _ in 0..STATEMACHINE_MAX_DEPTH {
            match cur.invoke(Signal::INQUIRE) {
                Outcome::Parent(p) => {
                    if &p == s {
                        return Ok(StateMembership::Ancestor);
                    }
                    cur = p;
                }
                Outcome::Top => return Ok(StateMembership::NotActive),
                Outcome::Handled => {
                    return Err(HSMError::ImpossibleTransition(
                        cur.to_string(),
                        "INQUIRE returned Handled instead of reporting a parent".into(),
                    ))
                }
            }
        }
        Err(HSMError::DepthExceeded(STATEMACHINE_MAX_DEPTH))
    }

    /// Non-destructively walks from `start` to the root via `INQUIRE`,
    /// returning `[start, start's parent, ..., outermost named ancestor]`.
    fn ancestor_chain(&self, start: &StateHandler<Ctx>) -> HSMResult<Vec<StateHandler<Ctx>>> {
        let mut chain = vec![start.clone()];
        let mut cur = start.clone();
        for _ in 0..STATEMACHINE_MAX_DEPTH {
            match cur.invoke(Signal::INQUIRE) {
                Outcome::Parent(p) => {
                    chain.push(p.clone());
                    cur = p;
                }
                Outcome::Top => return Ok(chain),
                Outcome::Handled => {
                    return Err(HSMError::ImpossibleTransition(
                        start.to_string(),
                        "INQUIRE returned Handled instead of reporting a parent".into(),
                    ))
                }
            }
        }
        Err(HSMError::DepthExceeded(STATEMACHINE_MAX_DEPTH))
    }

    /// Exits `self.current` and each ancestor up to, but not including,
    /// `boundary`. `boundary == None` means exit all the way to the
    /// (implicit) top -- used when `pitcher` and `target` share no named
    /// ancestor.
    fn exit_up_to(&self, boundary: Option<&StateHandler<Ctx>>) -> HSMResult<()> {
        let mut cur = self.current.borrow().clone().ok_or(HSMError::NotOpened)?;
        for _ in 0..STATEMACHINE_MAX_DEPTH {
            if let Some(b) = boundary {
                if &cur == b {
                    return Ok(());
                }
            }
            let next = match cur.invoke(Signal::EXIT) {
                Outcome::Parent(p) => p,
                Outcome::Handled => match cur.invoke(Signal::INQUIRE) {
                    Outcome::Parent(p) => p,
                    Outcome::Top => return Ok(()),
                    Outcome::Handled => {
                        return Err(HSMError::ImpossibleTransition(
                            cur.to_string(),
                            "INQUIRE returned Handled instead of reporting a parent".into(),
                        ))
                    }
                },
                Outcome::Top => return Ok(()),
            };
            cur = next;
        }
        Err(HSMError::DepthExceeded(STATEMACHINE_MAX_DEPTH))
    }

    /// Runs the entry/exit/init cascade that moves the machine from
    /// `pitcher` (the state whose handler requested the transition) to
    /// `target`, implementing the dispatch algorithm's least-common-ancestor
    /// cases, including self-transition and the implicit-top boundary case.
    fn transition_to(
        &self,
        pitcher: &StateHandler<Ctx>,
        target: &StateHandler<Ctx>,
    ) -> HSMResult<()> {
        self.logger.log_trace(
            &get_function_name!(),
            &format!("transitioning {} -> {}", pitcher, target),
        );

        // Case (a): transition to self. Everything from the actual active
        // leaf up through and including `pitcher` exits, then `pitcher`
        // re-enters itself before its init cascade runs again.
        if pitcher == target {
            let parent_of_pitcher = match pitcher.invoke(Signal::INQUIRE) {
                Outcome::Parent(p) => Some(p),
                Outcome::Top => None,
                Outcome::Handled => {
                    return Err(HSMError::ImpossibleTransition(
                        pitcher.to_string(),
                        "INQUIRE returned Handled instead of reporting a parent".into(),
                    ))
                }
            };
            self.exit_up_to(parent_of_pitcher.as_ref())?;
            target.invoke(Signal::ENTRY);
            return self.run_init_cascade(target.clone());
        }

        let pitcher_chain = self.ancestor_chain(pitcher)?;
        let target_chain = self.ancestor_chain(target)?;

        let lca = pitcher_chain.iter().find_map(|ancestor| {
            target_chain
                .iter()
                .position(|t| t == ancestor)
                .map(|pos| (ancestor.clone(), pos))
        });

        let (entry_prefix, exit_boundary) = match lca {
            Some((lca, pos)) => (target_chain[..pos].to_vec(), Some(lca)),
            None => (target_chain.clone(), None),
        };

        self.exit_up_to(exit_boundary.as_ref())?;

        {
            let mut path = self.path.borrow_mut();
            path.init();
            for s in &entry_prefix {
                path.push(s.clone())?;
            }
            while let Some(s) = path.pop() {
                s.invoke(Signal::ENTRY);
            }
        }

        self.run_init_cascade(target.clone())
    }

    /// Sends `INIT` to `start`, then to whatever child `initializer()`
    /// nominates (entering it first), and so on, until a state declines to
    /// nominate a child. Leaves `self.current` pointing at the innermost
    /// state reached.
    fn run_init_cascade(&self, start: StateHandler<Ctx>) -> HSMResult<()> {
        let mut cur = start;
        for _ in 0..STATEMACHINE_MAX_DEPTH {
            self.pending_init.borrow_mut().take();
            cur.invoke(Signal::INIT);
            match self.pending_init.borrow_mut().take() {
                Some(child) => {
                    child.invoke(Signal::ENTRY);
                    cur = child;
                }
                None => {
                    *self.current.borrow_mut() = Some(cur);
                    return Ok(());
                }
            }
        }
        Err(HSMError::DepthExceeded(STATEMACHINE_MAX_DEPTH))
    }
}

impl<Ctx> MachineDelegate<Ctx> for StateMachine<Ctx> {
    fn initializer(&self, child: StateHandler<Ctx>) {
        *self.pending_init.borrow_mut() = Some(child);
    }

    fn transition(&self, target: StateHandler<Ctx>) {
        *self.pending_transition.borrow_mut() = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;
    use std::cell::RefCell as StdRefCell;
    use std::rc::Rc;

    /// Minimal two-level hierarchy (Top -> Mid -> Leaf) used to exercise
    /// open()/dispatch()/is_in_state() without the full Samek fixture.
    struct Ctx {
        machine: RefCell<Option<Rc<StateMachine<Ctx>>>>,
        self_weak: StdRefCell<std::rc::Weak<Ctx>>,
        log: StdRefCell<Vec<&'static str>>,
    }

    impl Ctx {
        fn machine(&self) -> Rc<StateMachine<Ctx>> {
            Rc::clone(self.machine.borrow().as_ref().unwrap())
        }

        fn owner(&self) -> Rc<Ctx> {
            self.self_weak.borrow().upgrade().unwrap()
        }
    }

    fn top(ctx: &Ctx, signal: Signal) -> Outcome<Ctx> {
        match signal {
            Signal::ENTRY => {
                ctx.log.borrow_mut().push("TOP-ENTRY");
                Outcome::Handled
            }
            Signal::INIT => {
                ctx.machine().initializer(mid_handle(ctx));
                Outcome::Handled
            }
            _ => Outcome::Top,
        }
    }

    fn mid(ctx: &Ctx, signal: Signal) -> Outcome<Ctx> {
        match signal {
            Signal::ENTRY => {
                ctx.log.borrow_mut().push("MID-ENTRY");
                Outcome::Handled
            }
            Signal::EXIT => {
                ctx.log.borrow_mut().push("MID-EXIT");
                Outcome::Handled
            }
            Signal::INIT => {
                ctx.machine().initializer(leaf_handle(ctx));
                Outcome::Handled
            }
            _ if signal == Signal::user(0) => {
                ctx.log.borrow_mut().push("MID-A");
                Outcome::Handled
            }
            _ => Outcome::Parent(top_handle(ctx)),
        }
    }

    fn leaf(ctx: &Ctx, signal: Signal) -> Outcome<Ctx> {
        match signal {
            Signal::ENTRY => {
                ctx.log.borrow_mut().push("LEAF-ENTRY");
                Outcome::Handled
            }
            Signal::EXIT => {
                ctx.log.borrow_mut().push("LEAF-EXIT");
                Outcome::Handled
            }
            _ if signal == Signal::user(1) => {
                ctx.log.borrow_mut().push("LEAF-B");
                ctx.machine().transition(mid_handle(ctx));
                Outcome::Handled
            }
            _ => Outcome::Parent(mid_handle(ctx)),
        }
    }

    fn top_handle(ctx: &Ctx) -> StateHandler<Ctx> {
        StateHandler::new(ctx.owner(), top, "TOP")
    }
    fn mid_handle(ctx: &Ctx) -> StateHandler<Ctx> {
        StateHandler::new(ctx.owner(), mid, "MID")
    }
    fn leaf_handle(ctx: &Ctx) -> StateHandler<Ctx> {
        StateHandler::new(ctx.owner(), leaf, "LEAF")
    }

    fn build_machine() -> (Rc<StateMachine<Ctx>>, Rc<Ctx>) {
        let machine = Rc::new(StateMachine::new(HSMLogger::new(LevelFilter::Off)));
        let ctx = Rc::new(Ctx {
            machine: RefCell::new(None),
            self_weak: StdRefCell::new(std::rc::Weak::new()),
            log: StdRefCell::new(vec![]),
        });
        *ctx.machine.borrow_mut() = Some(Rc::clone(&machine));
        *ctx.self_weak.borrow_mut() = Rc::downgrade(&ctx);
        (machine, ctx)
    }

    fn handler(ctx: &Rc<Ctx>, f: crate::state::HandlerFn<Ctx>, name: &'static str) -> StateHandler<Ctx> {
        StateHandler::new(Rc::clone(ctx), f, name)
    }

    #[test]
    fn open_runs_entry_and_init_cascade() {
        let (machine, ctx) = build_machine();
        let top_h = handler(&ctx, top, "TOP");
        machine.open(top_h).unwrap();
        assert_eq!(
            *ctx.log.borrow(),
            vec!["TOP-ENTRY", "MID-ENTRY", "LEAF-ENTRY"]
        );
    }

    #[test]
    fn dispatch_bubbles_to_ancestor_and_returns_handled() {
        let (machine, ctx) = build_machine();
        machine.open(handler(&ctx, top, "TOP")).unwrap();
        ctx.log.borrow_mut().clear();
        let handled = machine.dispatch(Signal::user(0)).unwrap();
        assert!(handled);
        assert_eq!(*ctx.log.borrow(), vec!["MID-A"]);
    }

    #[test]
    fn dispatch_unhandled_signal_returns_false() {
        let (machine, ctx) = build_machine();
        machine.open(handler(&ctx, top, "TOP")).unwrap();
        let handled = machine.dispatch(Signal::user(9)).unwrap();
        assert!(!handled);
    }

    #[test]
    fn dispatch_before_open_is_not_opened() {
        let (machine, _ctx) = build_machine();
        assert!(matches!(
            machine.dispatch(Signal::user(0)),
            Err(HSMError::NotOpened)
        ));
    }

    #[test]
    fn is_in_state_reports_active_ancestors() {
        let (machine, ctx) = build_machine();
        machine.open(handler(&ctx, top, "TOP")).unwrap();
        assert_eq!(
            machine.is_in_state(&handler(&ctx, leaf, "LEAF")).unwrap(),
            StateMembership::Active
        );
        assert_eq!(
            machine.is_in_state(&handler(&ctx, mid, "MID")).unwrap(),
            StateMembership::Ancestor
        );
        assert_eq!(
            machine.is_in_state(&handler(&ctx, top, "TOP")).unwrap(),
            StateMembership::Ancestor
        );
    }

    #[test]
    fn transition_to_parent_exits_only_the_child_and_reruns_its_init() {
        // LEAF requests a transition to its own parent MID. MID is the
        // least common ancestor of pitcher (LEAF) and target (MID), so MID
        // itself is never exited or re-entered -- only LEAF exits, then
        // MID's init cascade reruns and re-selects LEAF as its child.
        let (machine, ctx) = build_machine();
        machine.open(handler(&ctx, top, "TOP")).unwrap();
        ctx.log.borrow_mut().clear();
        machine.dispatch(Signal::user(1)).unwrap();
        assert_eq!(
            *ctx.log.borrow(),
            vec!["LEAF-B", "LEAF-EXIT", "LEAF-ENTRY"]
        );
        assert_eq!(
            machine.is_in_state(&handler(&ctx, leaf, "LEAF")).unwrap(),
            StateMembership::Active
        );
    }
}
