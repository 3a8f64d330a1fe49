use super::{
    motion_error::MotionError,
    sample::{FINGER_COUNT, Hand, Sample},
};
use crate::warn;

/// Raw message as sent by the Leap Motion WebSocket service.
///
/// The service interleaves frames with handshake (`serviceVersion`) and device
/// event messages, so every field is optional. Only messages carrying `hands`
/// are frames.
#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeapMessage {
    id: Option<i64>,
    hands: Option<Vec<LeapHand>>,
    #[serde(default)]
    pointables: Vec<LeapPointable>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeapHand {
    id: i64,
    direction: [f32; 3],
    palm_normal: [f32; 3],
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LeapPointable {
    hand_id: i64,
    extended: bool,
    #[serde(rename = "type", default)]
    finger_type: i32,
    #[serde(default)]
    tool: bool,
}

impl LeapHand {
    fn pitch(&self) -> f32 { self.direction[1].atan2(-self.direction[2]) }

    fn yaw(&self) -> f32 { self.direction[0].atan2(-self.direction[2]) }

    fn roll(&self) -> f32 { self.palm_normal[0].atan2(-self.palm_normal[1]) }
}

impl LeapMessage {
    /// Decodes a raw text message. Returns `Ok(None)` for messages that are not frames.
    pub(crate) fn parse(text: &str) -> Result<Option<Sample>, MotionError> {
        let msg: LeapMessage =
            serde_json::from_str(text).map_err(|e| MotionError::Decode(e.to_string()))?;
        Ok(msg.into_sample())
    }

    /// The first raw hand stays primary. If it cannot be converted, the frame
    /// carries no hands instead of promoting a later one.
    fn into_sample(self) -> Option<Sample> {
        let LeapMessage { id, hands, pointables } = self;
        let mut converted = Vec::new();
        for (idx, hand) in hands?.iter().enumerate() {
            match hand_from_leap(hand, &pointables) {
                Some(h) => converted.push(h),
                None if idx == 0 => {
                    warn!("Primary hand {} lacks {FINGER_COUNT} tracked fingers, ignoring frame hands", hand.id);
                    break;
                }
                None => warn!("Dropping hand {} without {FINGER_COUNT} tracked fingers", hand.id),
            }
        }
        Some(Sample::new(id.unwrap_or_default(), converted))
    }
}

/// Builds a [`Hand`] from the pointables belonging to it, ordered thumb to pinky.
fn hand_from_leap(hand: &LeapHand, pointables: &[LeapPointable]) -> Option<Hand> {
    let mut fingers: Vec<&LeapPointable> =
        pointables.iter().filter(|p| p.hand_id == hand.id && !p.tool).collect();
    fingers.sort_by_key(|p| p.finger_type);
    let extended: Vec<bool> = fingers.iter().map(|p| p.extended).collect();
    let fingers_extended: [bool; FINGER_COUNT] = extended.try_into().ok()?;
    Some(Hand::new(hand.id, fingers_extended, hand.pitch(), hand.roll(), hand.yaw()))
}
