use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hsm::errors::HSMResult;
use hsm::logger::HSMLogger;
use hsm::machine::StateMachine;
use hsm::state::{HandlerFn, StateHandler};
use log::LevelFilter;

use super::light_events::LightEvents;
use super::light_hsm_data::LightHsmData;
use super::light_state_dimmer::dimmer;
use super::light_state_off::off;
use super::light_state_on::on;
use super::light_state_top::top;
use super::light_states::LightStates;

/// Owner context for the whole light switch: Top contains On and Off, On
/// contains Dimmer. Opens straight down to Dimmer, mirroring a light that
/// defaults to fully on.
pub struct LightControllerHsm {
    self_weak: RefCell<Weak<LightControllerHsm>>,
    machine: RefCell<Option<Rc<StateMachine<LightControllerHsm>>>>,
    pub(crate) data: RefCell<LightHsmData>,
}

impl LightControllerHsm {
    pub fn new(log_level: LevelFilter) -> Rc<Self> {
        let controller = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            machine: RefCell::new(None),
            data: RefCell::new(LightHsmData::new()),
        });
        *controller.self_weak.borrow_mut() = Rc::downgrade(&controller);
        *controller.machine.borrow_mut() =
            Some(Rc::new(StateMachine::new(HSMLogger::new(log_level))));
        controller
    }

    pub fn open(self: &Rc<Self>) -> HSMResult<()> {
        self.machine().open(self.handle(top, "Top"))
    }

    pub fn dispatch_event(self: &Rc<Self>, event: LightEvents) -> HSMResult<bool> {
        match event {
            LightEvents::Set(pct) => self.data.borrow_mut().stash_set(pct),
            LightEvents::IncreaseByPercent(pct) => self.data.borrow_mut().stash_increase(pct),
            LightEvents::ReduceByPercent(pct) => self.data.borrow_mut().stash_decrease(pct),
            LightEvents::Toggle | LightEvents::TurnOn | LightEvents::TurnOff => {}
        }
        self.machine().dispatch(event.signal())
    }

    pub fn current_state(self: &Rc<Self>) -> LightStates {
        let current = self.machine().current().expect("open() called before use");
        if current == self.handle(top, "Top") {
            LightStates::Top
        } else if current == self.handle(on, "On") {
            LightStates::On
        } else if current == self.handle(off, "Off") {
            LightStates::Off
        } else {
            LightStates::Dimmer
        }
    }

    pub fn light_percentage(&self) -> u8 {
        self.data.borrow().light_percentage
    }

    pub(crate) fn owner(&self) -> Rc<LightControllerHsm> {
        self.self_weak
            .borrow()
            .upgrade()
            .expect("LightControllerHsm outlives its own handles")
    }

    pub(crate) fn machine(&self) -> Rc<StateMachine<LightControllerHsm>> {
        Rc::clone(
            self.machine
                .borrow()
                .as_ref()
                .expect("LightControllerHsm::new always sets a machine"),
        )
    }

    pub(crate) fn handle(
        &self,
        f: HandlerFn<LightControllerHsm>,
        name: &'static str,
    ) -> StateHandler<LightControllerHsm> {
        StateHandler::new(self.owner(), f, name)
    }
}
