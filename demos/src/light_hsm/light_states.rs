use strum::Display;

/// Named purely for diagnostics and test assertions -- the engine itself
/// dispatches by function pointer identity, never by this enum.
#[derive(Display, Clone, Copy, PartialEq, Eq, Debug)]
pub enum LightStates {
    Top,
    On,
    Off,
    Dimmer,
}
