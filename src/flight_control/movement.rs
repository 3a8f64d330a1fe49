use strum_macros::Display;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum Axis {
    Pitch,
    Roll,
    Yaw,
}

/// Movement or re-centering command for a single axis.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display)]
pub enum MovementCommand {
    MoveForward,
    MoveBack,
    ResetPitch,
    MoveLeft,
    MoveRight,
    ResetRoll,
    SpinLeft,
    SpinRight,
    ResetYaw,
}

impl MovementCommand {
    pub fn axis(self) -> Axis {
        match self {
            MovementCommand::MoveForward | MovementCommand::MoveBack | MovementCommand::ResetPitch => {
                Axis::Pitch
            }
            MovementCommand::MoveLeft | MovementCommand::MoveRight | MovementCommand::ResetRoll => {
                Axis::Roll
            }
            MovementCommand::SpinLeft | MovementCommand::SpinRight | MovementCommand::ResetYaw => Axis::Yaw,
        }
    }
}

/// Maps hand orientation to one command per axis.
pub struct MovementMapper;

impl MovementMapper {
    /// Half width of the dead zone around neutral. The bounds themselves are inside the zone.
    pub const DEAD_ZONE: f32 = 0.5;

    /// Returns the pitch, roll and yaw commands, in that order.
    pub fn map(pitch: f32, roll: f32, yaw: f32) -> [MovementCommand; 3] {
        [
            Self::map_axis(Axis::Pitch, pitch),
            Self::map_axis(Axis::Roll, roll),
            Self::map_axis(Axis::Yaw, yaw),
        ]
    }

    pub fn map_axis(axis: Axis, value: f32) -> MovementCommand {
        let (negative, positive, reset) = match axis {
            Axis::Pitch => (MovementCommand::MoveForward, MovementCommand::MoveBack, MovementCommand::ResetPitch),
            Axis::Roll => (MovementCommand::MoveLeft, MovementCommand::MoveRight, MovementCommand::ResetRoll),
            Axis::Yaw => (MovementCommand::SpinLeft, MovementCommand::SpinRight, MovementCommand::ResetYaw),
        };
        if value < -Self::DEAD_ZONE {
            negative
        } else if value > Self::DEAD_ZONE {
            positive
        } else {
            reset
        }
    }
}
