//! Drone command actuators. The controller only sees [`DroneActuator`].

mod actuator;
mod http_actuator;
mod http_client;
mod sim_actuator;

pub use actuator::{ActuatorError, DroneActuator, DroneCommand};
pub use http_actuator::HttpActuator;
pub use sim_actuator::SimActuator;
