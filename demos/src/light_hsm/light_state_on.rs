use hsm::signal::Signal;
use hsm::state::Outcome;

use super::light_events::signals;
use super::light_hsm_controller::LightControllerHsm;
use super::light_state_dimmer::dimmer;
use super::light_state_off::off;
use super::light_state_top::top;

/// `On` always cascades straight into `Dimmer`, so its own `INIT` -- run
/// exactly once per descent, never on a `Dimmer`-internal adjustment -- is
/// the right place to snap the light to fully on.
pub(crate) fn on(ctx: &LightControllerHsm, signal: Signal) -> Outcome<LightControllerHsm> {
    match signal {
        Signal::ENTRY => {
            ctx.data.borrow_mut().on_enter_count += 1;
            Outcome::Handled
        }
        Signal::EXIT => {
            ctx.data.borrow_mut().on_exit_count += 1;
            Outcome::Handled
        }
        Signal::INIT => {
            ctx.data.borrow_mut().turn_on();
            ctx.machine().initializer(ctx.handle(dimmer, "Dimmer"));
            Outcome::Handled
        }
        _ if signal == signals::TOGGLE || signal == signals::TURN_OFF => {
            ctx.machine().transition(ctx.handle(off, "Off"));
            Outcome::Handled
        }
        _ => Outcome::Parent(ctx.handle(top, "Top")),
    }
}
