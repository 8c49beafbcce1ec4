use hsm::signal::Signal;
use hsm::state::Outcome;

use super::light_events::signals;
use super::light_hsm_controller::LightControllerHsm;
use super::light_state_on::on;
use super::light_state_top::top;

/// A leaf directly under `Top`; `ENTRY` is its only settling point, so the
/// light is zeroed there.
pub(crate) fn off(ctx: &LightControllerHsm, signal: Signal) -> Outcome<LightControllerHsm> {
    match signal {
        Signal::ENTRY => {
            ctx.data.borrow_mut().off_enter_count += 1;
            ctx.data.borrow_mut().turn_off();
            Outcome::Handled
        }
        Signal::EXIT => {
            ctx.data.borrow_mut().off_exit_count += 1;
            Outcome::Handled
        }
        _ if signal == signals::TOGGLE || signal == signals::TURN_ON => {
            ctx.machine().transition(ctx.handle(on, "On"));
            Outcome::Handled
        }
        _ => Outcome::Parent(ctx.handle(top, "Top")),
    }
}
