use crate::flight_control::MovementCommand;
use async_trait::async_trait;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Every command the drone accepts. Each one completes without payload.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DroneCommand {
    TakeOff,
    Land,
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

impl DroneCommand {
    pub fn is_transition(self) -> bool { matches!(self, DroneCommand::TakeOff | DroneCommand::Land) }
}

impl From<MovementCommand> for DroneCommand {
    fn from(value: MovementCommand) -> Self {
        match value {
            MovementCommand::MoveForward => DroneCommand::MoveForward,
            MovementCommand::MoveBack => DroneCommand::MoveBack,
            MovementCommand::ResetPitch => DroneCommand::ResetPitch,
            MovementCommand::MoveLeft => DroneCommand::MoveLeft,
            MovementCommand::MoveRight => DroneCommand::MoveRight,
            MovementCommand::ResetRoll => DroneCommand::ResetRoll,
            MovementCommand::SpinLeft => DroneCommand::SpinLeft,
            MovementCommand::SpinRight => DroneCommand::SpinRight,
            MovementCommand::ResetYaw => DroneCommand::ResetYaw,
        }
    }
}

#[derive(Debug, Display)]
pub enum ActuatorError {
    Rejected(String),
    NoConnection,
    Timeout,
    Internal,
    Unknown,
}

impl std::error::Error for ActuatorError {}

impl From<reqwest::Error> for ActuatorError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ActuatorError::Timeout
        } else if value.is_connect() {
            ActuatorError::NoConnection
        } else if value.is_request() || value.is_decode() {
            ActuatorError::Rejected(value.to_string())
        } else {
            ActuatorError::Unknown
        }
    }
}

/// Capability set of the drone command actuator.
///
/// Implementations must be callable concurrently: movement commands of the
/// three axes are issued at the same time.
#[async_trait]
pub trait DroneActuator: Send + Sync {
    /// One time connection setup, called before any command is issued.
    async fn init(&self) -> Result<(), ActuatorError>;
    async fn execute(&self, command: DroneCommand) -> Result<(), ActuatorError>;
    fn type_name(&self) -> &'static str;
}
