use chrono::{DateTime, Utc};

/// Number of tracked fingers per hand, ordered thumb to pinky.
pub const FINGER_COUNT: usize = 5;

/// Pose of a single tracked hand within one frame.
///
/// Orientation axes are given in radians as reported by the tracking device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hand {
    id: i64,
    fingers_extended: [bool; FINGER_COUNT],
    pitch: f32,
    roll: f32,
    yaw: f32,
}

impl Hand {
    pub fn new(id: i64, fingers_extended: [bool; FINGER_COUNT], pitch: f32, roll: f32, yaw: f32) -> Self {
        Self { id, fingers_extended, pitch, roll, yaw }
    }

    pub fn id(&self) -> i64 { self.id }
    pub fn fingers_extended(&self) -> &[bool; FINGER_COUNT] { &self.fingers_extended }
    pub fn pitch(&self) -> f32 { self.pitch }
    pub fn roll(&self) -> f32 { self.roll }
    pub fn yaw(&self) -> f32 { self.yaw }
}

/// One frame of hand tracking data. Superseded by the next sample, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    frame_id: i64,
    timestamp: DateTime<Utc>,
    hands: Vec<Hand>,
}

impl Sample {
    pub fn new(frame_id: i64, hands: Vec<Hand>) -> Self {
        Self { frame_id, timestamp: Utc::now(), hands }
    }

    pub fn frame_id(&self) -> i64 { self.frame_id }
    pub fn timestamp(&self) -> DateTime<Utc> { self.timestamp }
    pub fn hands(&self) -> &[Hand] { &self.hands }

    /// The hand used for drone commands. Any further hands are ignored.
    pub fn primary_hand(&self) -> Option<&Hand> { self.hands.first() }
}

/// Everything the motion stream can deliver to the controller.
#[derive(Debug, Clone)]
pub enum MotionEvent {
    Connected,
    Disconnected,
    Frame(Sample),
}
