use hsm::signal::Signal;
use hsm::state::Outcome;

use super::light_events::signals;
use super::light_hsm_controller::LightControllerHsm;
use super::light_state_on::on;

/// Adjusts the shared light percentage. `Toggle`/`TurnOn`/`TurnOff` are left
/// unhandled here on purpose -- they bubble to `On`, which already
/// implements them, rather than being duplicated.
pub(crate) fn dimmer(ctx: &LightControllerHsm, signal: Signal) -> Outcome<LightControllerHsm> {
    match signal {
        Signal::ENTRY => {
            ctx.data.borrow_mut().dimmer_enter_count += 1;
            Outcome::Handled
        }
        Signal::EXIT => {
            ctx.data.borrow_mut().dimmer_exit_count += 1;
            Outcome::Handled
        }
        _ if signal == signals::SET
            || signal == signals::REDUCE
            || signal == signals::INCREASE =>
        {
            let resulting = ctx.data.borrow_mut().apply_pending();
            if resulting == 0 {
                ctx.machine()
                    .transition(ctx.handle(super::light_state_off::off, "Off"));
            }
            Outcome::Handled
        }
        _ => Outcome::Parent(ctx.handle(on, "On")),
    }
}
