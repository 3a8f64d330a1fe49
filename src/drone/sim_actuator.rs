use super::actuator::{ActuatorError, DroneActuator, DroneCommand};
use crate::{event, log};
use async_trait::async_trait;
use rand::Rng;
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

/// Dry run actuator used when no drone bridge is configured.
///
/// Commands only log and sleep. Movement commands get a random extra latency so
/// that commands of consecutive samples may resolve out of order, as on a real link.
pub struct SimActuator {
    connected: AtomicBool,
}

impl SimActuator {
    const MAX_JITTER_MS: u64 = 30;

    const TAKE_OFF_DELAY: Duration = Duration::from_secs(3);
    const LAND_DELAY: Duration = Duration::from_secs(2);
    const MOVE_DELAY: Duration = Duration::from_millis(20);

    /// Creates a simulated drone. Commands fail with [`ActuatorError::NoConnection`]
    /// until [`DroneActuator::init`] was awaited.
    pub fn new() -> Self { Self { connected: AtomicBool::new(false) } }

    /// Nominal time a command takes, plus random jitter for movement commands.
    pub(super) fn delay_for(command: DroneCommand) -> Duration {
        match command {
            DroneCommand::TakeOff => Self::TAKE_OFF_DELAY,
            DroneCommand::Land => Self::LAND_DELAY,
            _ => {
                let jitter = rand::rng().random_range(0..=Self::MAX_JITTER_MS);
                Self::MOVE_DELAY + Duration::from_millis(jitter)
            }
        }
    }
}

impl Default for SimActuator {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl DroneActuator for SimActuator {
    async fn init(&self) -> Result<(), ActuatorError> {
        self.connected.store(true, Ordering::Release);
        log!("Simulated drone ready");
        Ok(())
    }

    async fn execute(&self, command: DroneCommand) -> Result<(), ActuatorError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(ActuatorError::NoConnection);
        }
        let delay = Self::delay_for(command);
        event!("Simulating {command} for {}ms", delay.as_millis());
        tokio::time::sleep(delay).await;
        Ok(())
    }

    fn type_name(&self) -> &'static str { "SimActuator" }
}
