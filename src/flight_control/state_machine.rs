use super::{
    flight_state::{FailurePolicy, FlightState, Transition, TransitionPolicy},
    gesture::Gesture,
    signal::TransitionSignal,
};
use crate::{error, event, info, warn};

/// Owner of the [`FlightState`].
///
/// Intents are only honored in their guard state: take-off from `Landed`,
/// landing from `Flying`. The transitional states are left exclusively through
/// [`FlightStateMachine::complete`].
#[derive(Debug, Default)]
pub struct FlightStateMachine {
    state: FlightState,
    policy: TransitionPolicy,
}

impl FlightStateMachine {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self { state: FlightState::Landed, policy }
    }

    pub fn state(&self) -> FlightState { self.state }
    pub fn policy(&self) -> TransitionPolicy { self.policy }

    /// Applies the intent of `gesture`.
    ///
    /// # Returns
    /// The transition that was started, if any. The caller is responsible for
    /// issuing the actuator command and reporting back via [`Self::complete`].
    pub fn apply(&mut self, gesture: Gesture) -> Option<Transition> {
        let transition = gesture.intent()?;
        if self.state != transition.origin() {
            event!("Ignoring {gesture} while {}", self.state);
            return None;
        }
        self.state = transition.pending();
        info!("{transition} requested, now {}", self.state);
        Some(transition)
    }

    /// Applies the completion of a previously started transition and returns the new state.
    pub fn complete(&mut self, signal: &TransitionSignal) -> FlightState {
        let transition = signal.transition();
        if self.state != transition.pending() {
            warn!("Discarding stale {transition} completion while {}", self.state);
            return self.state;
        }
        match (signal.result(), self.policy.failure) {
            (Ok(()), _) => {
                self.state = transition.target();
                info!("{transition} complete, now {}", self.state);
            }
            (Err(e), FailurePolicy::Hold) => {
                error!("{transition} failed with {e:?}, holding {}", self.state);
            }
            (Err(e), FailurePolicy::Revert) => {
                self.state = transition.origin();
                error!("{transition} failed with {e:?}, reverted to {}", self.state);
            }
        }
        self.state
    }
}
