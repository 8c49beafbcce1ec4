use hsm::signal::Signal;
use strum::Display;

/// Application-level vocabulary for the light switch. `dispatch_event`
/// translates each variant into the bare `Signal` the engine actually
/// dispatches, stashing any payload in the controller's shared data first
/// since signals themselves carry no payload.
#[derive(Debug, Display, Clone, Copy)]
pub enum LightEvents {
    Toggle,
    TurnOn,
    TurnOff,
    /// Sets the light to a value from 0-100.
    Set(u8),
    /// Reduces the lighting by a percentage from 0-100, floored at 0.
    ReduceByPercent(u8),
    /// Increases the lighting by a percentage from 0-100, capped at 100.
    IncreaseByPercent(u8),
}

pub mod signals {
    use hsm::signal::Signal;

    pub const TOGGLE: Signal = Signal::user(0);
    pub const TURN_ON: Signal = Signal::user(1);
    pub const TURN_OFF: Signal = Signal::user(2);
    pub const SET: Signal = Signal::user(3);
    pub const REDUCE: Signal = Signal::user(4);
    pub const INCREASE: Signal = Signal::user(5);
}

impl LightEvents {
    pub(crate) fn signal(&self) -> Signal {
        match self {
            LightEvents::Toggle => signals::TOGGLE,
            LightEvents::TurnOn => signals::TURN_ON,
            LightEvents::TurnOff => signals::TURN_OFF,
            LightEvents::Set(_) => signals::SET,
            LightEvents::ReduceByPercent(_) => signals::REDUCE,
            LightEvents::IncreaseByPercent(_) => signals::INCREASE,
        }
    }
}
