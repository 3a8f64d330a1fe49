use super::{
    actuator::{ActuatorError, DroneActuator, DroneCommand},
    http_client::HTTPClient,
};
use crate::event;
use async_trait::async_trait;

/// Request body for the `/command` endpoint of the drone bridge.
#[derive(serde::Serialize, Debug)]
struct CommandRequest {
    /// The command name encoded as a snake case `str`.
    command: &'static str,
}

/// Actuator forwarding every command to an HTTP drone bridge.
pub struct HttpActuator {
    client: HTTPClient,
}

impl HttpActuator {
    const CONNECT_ENDPOINT: &'static str = "/connect";
    const COMMAND_ENDPOINT: &'static str = "/command";

    /// Creates an actuator for the bridge listening at `base_url`.
    ///
    /// No request is sent here, [`DroneActuator::init`] opens the drone link.
    pub fn new(base_url: &str) -> Result<Self, ActuatorError> {
        Ok(Self { client: HTTPClient::new(base_url)? })
    }

    pub fn url(&self) -> &str { self.client.url() }
}

#[async_trait]
impl DroneActuator for HttpActuator {
    async fn init(&self) -> Result<(), ActuatorError> {
        self.client.post_json(Self::CONNECT_ENDPOINT, &serde_json::json!({})).await
    }

    async fn execute(&self, command: DroneCommand) -> Result<(), ActuatorError> {
        event!("Sending {command} to drone bridge");
        let req = CommandRequest { command: command.into() };
        self.client.post_json(Self::COMMAND_ENDPOINT, &req).await
    }

    fn type_name(&self) -> &'static str { "HttpActuator" }
}
