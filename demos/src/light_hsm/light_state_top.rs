use hsm::signal::Signal;
use hsm::state::Outcome;

use super::light_hsm_controller::LightControllerHsm;
use super::light_state_on::on;

/// The root of the hierarchy. Nominates `On` as the default branch and
/// absorbs every signal neither `On` nor `Off` recognized, so an unhandled
/// event is simply a no-op rather than a dispatch failure.
pub(crate) fn top(ctx: &LightControllerHsm, signal: Signal) -> Outcome<LightControllerHsm> {
    match signal {
        Signal::ENTRY => {
            ctx.data.borrow_mut().top_enter_count += 1;
            Outcome::Handled
        }
        Signal::EXIT => {
            ctx.data.borrow_mut().top_exit_count += 1;
            Outcome::Handled
        }
        Signal::INIT => {
            ctx.machine().initializer(ctx.handle(on, "On"));
            Outcome::Handled
        }
        // No parent to report -- distinct from the catch-all below, which
        // absorbs application signals nobody else handled.
        Signal::INQUIRE => Outcome::Top,
        _ => Outcome::Handled,
    }
}
