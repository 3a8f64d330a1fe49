#![allow(clippy::module_name_repetitions)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod drone;
mod flight_control;
mod logger;
mod motion;

use crate::config::PitConfig;
use crate::drone::{DroneActuator, HttpActuator, SimActuator};
use crate::flight_control::FlightController;
use crate::motion::{Hand, LeapStream, Sample};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = PitConfig::from_env();
    let actuator = init_actuator(&config).await;

    let c_tok = CancellationToken::new();
    let shutdown_tok = c_tok.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            shutdown_tok.cancel();
        }
    });

    let motion_rx = LeapStream::start(config.leap_url().to_string(), c_tok.clone());
    let policy = config.transition_policy();
    info!(
        "Listening on {} with {}, failure policy {}",
        config.leap_url(),
        actuator.type_name(),
        policy.failure
    );
    let mut controller = FlightController::new(actuator, policy);
    controller.run(motion_rx, c_tok).await;
    let last_frame = controller.latest_sample().map(Sample::frame_id);
    let last_hand = controller.hand().map(Hand::id);
    info!("Controller stopped while {}, last frame {last_frame:?}, last hand {last_hand:?}", controller.state());
    if controller.state().is_transitional() {
        warn!("Stopped before the drone confirmed the {} transition", controller.state());
    }
}

async fn init_actuator(config: &PitConfig) -> Arc<dyn DroneActuator> {
    let actuator: Arc<dyn DroneActuator> = match config.drone_url() {
        Some(url) => match HttpActuator::new(url) {
            Ok(http) => {
                log!("Using drone bridge at {}", http.url());
                Arc::new(http)
            }
            Err(e) => fatal!("Could not build drone client for {url}: {e:?}"),
        },
        None => {
            warn!("PIT_DRONE_URL not set, commands go to a simulated drone");
            Arc::new(SimActuator::new())
        }
    };
    if let Err(e) = actuator.init().await {
        fatal!("{} failed to initialize: {e:?}", actuator.type_name());
    }
    actuator
}
