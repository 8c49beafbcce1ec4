mod light_hsm;

use light_hsm::light_events::LightEvents;
use light_hsm::light_hsm_controller::LightControllerHsm;
use light_hsm::light_states::LightStates;

fn main() {
    let light_hsm = LightControllerHsm::new(log::LevelFilter::Info);
    light_hsm.open().expect("open() should only be called once");

    let starting_state = light_hsm.current_state();
    assert_eq!(
        starting_state,
        LightStates::Dimmer,
        "expected to open straight down into Dimmer"
    );
    assert_eq!(light_hsm.light_percentage(), 100);

    {
        let data = light_hsm.data.borrow();
        assert_eq!(data.top_enter_count, 1);
        assert_eq!(data.top_exit_count, 0);
        assert_eq!(data.on_enter_count, 1);
        assert_eq!(data.on_exit_count, 0);
        assert_eq!(data.dimmer_enter_count, 1);
        assert_eq!(data.dimmer_exit_count, 0);
        assert_eq!(data.off_enter_count, 0);
        assert_eq!(data.off_exit_count, 0);
    }
    light_hsm.data.borrow_mut().clear_counts();

    println!("Dimming to 0 turns the light off");
    light_hsm
        .dispatch_event(LightEvents::Set(0))
        .expect("dispatch should not error");
    assert_eq!(light_hsm.current_state(), LightStates::Off);
    assert_eq!(light_hsm.light_percentage(), 0);
    {
        let data = light_hsm.data.borrow();
        assert_eq!(data.dimmer_exit_count, 1);
        assert_eq!(data.on_exit_count, 1);
        assert_eq!(data.off_enter_count, 1);
    }
    light_hsm.data.borrow_mut().clear_counts();

    println!("TurnOn from Off re-enters On -> Dimmer at full brightness");
    light_hsm
        .dispatch_event(LightEvents::TurnOn)
        .expect("dispatch should not error");
    assert_eq!(light_hsm.current_state(), LightStates::Dimmer);
    assert_eq!(light_hsm.light_percentage(), 100);
    light_hsm.data.borrow_mut().clear_counts();

    println!("Toggle while on turns it off by bubbling through On");
    light_hsm
        .dispatch_event(LightEvents::Toggle)
        .expect("dispatch should not error");
    assert_eq!(light_hsm.current_state(), LightStates::Off);
    {
        let data = light_hsm.data.borrow();
        assert_eq!(data.on_exit_count, 1);
        assert_eq!(data.off_enter_count, 1);
    }

    println!("Reducing by 50 while off is absorbed by Top -- Off doesn't dim");
    light_hsm
        .dispatch_event(LightEvents::ReduceByPercent(50))
        .expect("dispatch should not error");
    assert_eq!(light_hsm.current_state(), LightStates::Off);
    assert_eq!(light_hsm.light_percentage(), 0);

    println!("All assertions passed.");
}
