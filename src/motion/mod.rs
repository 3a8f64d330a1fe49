//! Hand tracking input: the per frame [`Sample`] model and the Leap Motion
//! WebSocket reader producing it.

mod leap_frame;
mod leap_stream;
mod motion_error;
mod sample;

pub use leap_stream::LeapStream;
pub use sample::{FINGER_COUNT, Hand, MotionEvent, Sample};
