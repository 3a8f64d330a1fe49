use super::flight_state::Transition;
use crate::drone::ActuatorError;

/// Completion of a take-off or landing, sent back to the controller loop.
#[derive(Debug)]
pub struct TransitionSignal {
    transition: Transition,
    result: Result<(), ActuatorError>,
}

impl TransitionSignal {
    pub fn new(transition: Transition, result: Result<(), ActuatorError>) -> Self {
        Self { transition, result }
    }

    pub fn transition(&self) -> Transition { self.transition }
    pub fn result(&self) -> &Result<(), ActuatorError> { &self.result }
}
