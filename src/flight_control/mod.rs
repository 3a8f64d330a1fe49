//! Gesture interpretation and flight state control.
//!
//! [`FlightController`] drives [`gesture::Gesture`] classification, the
//! [`state_machine::FlightStateMachine`] and the [`movement::MovementMapper`]
//! for every incoming sample.

mod controller;
mod flight_state;
mod gesture;
mod movement;
mod signal;
mod state_machine;
#[cfg(test)]
mod tests;

pub use controller::FlightController;
pub use flight_state::{FailurePolicy, TransitionPolicy};
pub use movement::MovementCommand;
