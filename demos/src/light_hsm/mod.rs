pub(crate) mod light_events;
pub(crate) mod light_hsm_controller;
mod light_hsm_data;
mod light_state_dimmer;
mod light_state_off;
mod light_state_on;
mod light_state_top;
pub(crate) mod light_states;
