use crate::drone::DroneCommand;
use std::time::Duration;
use strum_macros::Display;

/// Flight state of the drone as tracked by the controller.
///
/// Cycles strictly `Landed -> TakingOff -> Flying -> Landing -> Landed`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, Default)]
pub enum FlightState {
    #[default]
    Landed,
    TakingOff,
    Flying,
    Landing,
}

impl FlightState {
    /// True while a take-off or landing is in flight.
    pub fn is_transitional(self) -> bool {
        matches!(self, FlightState::TakingOff | FlightState::Landing)
    }
}

/// One of the two asynchronous state transitions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum Transition {
    TakeOff,
    Land,
}

impl Transition {
    /// The stable state this transition may start from.
    pub fn origin(self) -> FlightState {
        match self {
            Transition::TakeOff => FlightState::Landed,
            Transition::Land => FlightState::Flying,
        }
    }

    /// The state held until the actuator reports completion.
    pub fn pending(self) -> FlightState {
        match self {
            Transition::TakeOff => FlightState::TakingOff,
            Transition::Land => FlightState::Landing,
        }
    }

    /// The stable state reached on successful completion.
    pub fn target(self) -> FlightState {
        match self {
            Transition::TakeOff => FlightState::Flying,
            Transition::Land => FlightState::Landed,
        }
    }

    pub fn command(self) -> DroneCommand {
        match self {
            Transition::TakeOff => DroneCommand::TakeOff,
            Transition::Land => DroneCommand::Land,
        }
    }
}

/// What happens to a transitional state whose actuator call failed or timed out.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Display)]
pub enum FailurePolicy {
    /// Stay in `TakingOff`/`Landing`. No further intents are accepted.
    #[default]
    Hold,
    /// Fall back to the stable state the transition started from.
    Revert,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct TransitionPolicy {
    pub failure: FailurePolicy,
    /// Upper bound on a take-off or landing. `None` waits forever.
    pub timeout: Option<Duration>,
}
