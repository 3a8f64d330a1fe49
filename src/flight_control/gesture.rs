use super::flight_state::Transition;
use crate::motion::FINGER_COUNT;
use itertools::Itertools;
use strum_macros::Display;

/// Classification of a hand's finger pattern.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum Gesture {
    /// The fingers disagree, no intent is derived.
    Ambiguous,
    /// Open hand, requests take-off.
    AllExtended,
    /// Fist, requests landing.
    AllRetracted,
}

impl Gesture {
    /// A pattern is only unambiguous when every finger agrees with the first one.
    pub fn classify(fingers_extended: &[bool; FINGER_COUNT]) -> Self {
        if !fingers_extended.iter().all_equal() {
            return Gesture::Ambiguous;
        }
        if fingers_extended[0] { Gesture::AllExtended } else { Gesture::AllRetracted }
    }

    pub fn intent(self) -> Option<Transition> {
        match self {
            Gesture::Ambiguous => None,
            Gesture::AllExtended => Some(Transition::TakeOff),
            Gesture::AllRetracted => Some(Transition::Land),
        }
    }
}
