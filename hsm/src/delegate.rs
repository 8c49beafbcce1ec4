//! Module encapsulating the powers the state machine delegates to states,
//! obscured to external consumers of the machine itself.
use std::rc::Rc;

use crate::state::StateHandler;

/// Operations callable from *within* a state's handler. The machine
/// implements this and hands a reference to it to every owner context, so
/// states can know about the machine while the machine knows about states
/// only indirectly (through the handlers it holds).
pub trait MachineDelegate<Ctx> {
    /// Nominate `child` as the immediate default sub-state. Valid only
    /// during an INIT invocation; effect is `current := child`.
    fn initializer(&self, child: StateHandler<Ctx>);

    /// Request a transition to `target`. Valid only during a user-signal
    /// invocation; effect is `target := target`. If called more than once
    /// while handling one event, the last call wins.
    fn transition(&self, target: StateHandler<Ctx>);
}

pub type Delegate<Ctx> = Rc<dyn MachineDelegate<Ctx>>;

#[cfg(test)]
pub mod delegate_test_utils {
    use super::*;
    use std::cell::RefCell;

    /// Mocked delegate usable to unit test a single state's handler in
    /// isolation from a real machine.
    pub struct MockedDelegate<Ctx> {
        pub initializers_requested: RefCell<Vec<StateHandler<Ctx>>>,
        pub transitions_requested: RefCell<Vec<StateHandler<Ctx>>>,
    }

    impl<Ctx> MockedDelegate<Ctx> {
        pub fn new() -> Rc<Self> {
            Rc::new(Self {
                initializers_requested: RefCell::new(vec![]),
                transitions_requested: RefCell::new(vec![]),
            })
        }
    }

    impl<Ctx> MachineDelegate<Ctx> for MockedDelegate<Ctx> {
        fn initializer(&self, child: StateHandler<Ctx>) {
            self.initializers_requested.borrow_mut().push(child);
        }

        fn transition(&self, target: StateHandler<Ctx>) {
            self.transitions_requested.borrow_mut().push(target);
        }
    }
}
