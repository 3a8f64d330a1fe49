use super::{
    flight_state::{FlightState, Transition, TransitionPolicy},
    gesture::Gesture,
    movement::MovementMapper,
    signal::TransitionSignal,
    state_machine::FlightStateMachine,
};
use crate::drone::{ActuatorError, DroneActuator};
use crate::motion::{Hand, MotionEvent, Sample};
use crate::{error, event, info, log};
use std::sync::Arc;
use tokio::{
    sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Result of evaluating a single [`Sample`].
#[derive(Debug)]
pub enum SampleOutcome {
    /// The sample contained no tracked hand and was only recorded.
    NoHand,
    Evaluated {
        gesture: Gesture,
        /// Handle to the movement dispatch of this sample. Dropping it leaves the
        /// dispatch running.
        movement: Option<JoinHandle<()>>,
    },
}

/// Translates hand samples into drone commands.
///
/// All state is written from the task driving the controller: intents are
/// applied synchronously in [`FlightController::handle_sample`] and actuator
/// completions come back through an internal channel, see
/// [`FlightController::process_next_completion`].
pub struct FlightController {
    actuator: Arc<dyn DroneActuator>,
    state_machine: FlightStateMachine,
    /// Latest received sample, with or without hands.
    latest_sample: Option<Sample>,
    /// Last hand seen. Kept when later samples have no hands.
    hand: Option<Hand>,
    completion_tx: UnboundedSender<TransitionSignal>,
    completion_rx: UnboundedReceiver<TransitionSignal>,
}

impl FlightController {
    /// Creates a controller in [`FlightState::Landed`] without any sample.
    ///
    /// # Arguments
    /// * `actuator` – The drone to command. It must already be initialized.
    /// * `policy` – How failed or hanging take-offs and landings are resolved.
    ///
    /// # Returns
    /// A controller ready to be driven by [`FlightController::run`].
    pub fn new(actuator: Arc<dyn DroneActuator>, policy: TransitionPolicy) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            actuator,
            state_machine: FlightStateMachine::new(policy),
            latest_sample: None,
            hand: None,
            completion_tx,
            completion_rx,
        }
    }

    pub fn state(&self) -> FlightState { self.state_machine.state() }
    pub fn latest_sample(&self) -> Option<&Sample> { self.latest_sample.as_ref() }
    pub fn hand(&self) -> Option<&Hand> { self.hand.as_ref() }

    /// Consumes motion events until the stream ends or `c_tok` is cancelled.
    pub async fn run(&mut self, mut motion_rx: Receiver<MotionEvent>, c_tok: CancellationToken) {
        loop {
            tokio::select! {
                () = c_tok.cancelled() => break,
                () = self.process_next_completion() => {},
                event = motion_rx.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }
    }

    pub fn handle_event(&mut self, event: MotionEvent) {
        match event {
            MotionEvent::Connected => info!("Connection established with Leap Motion"),
            MotionEvent::Disconnected => info!("Disconnected from Leap Motion"),
            MotionEvent::Frame(sample) => {
                event!(
                    "Frame {} at {} with {} hands",
                    sample.frame_id(),
                    sample.timestamp().format("%H:%M:%S%.3f"),
                    sample.hands().len()
                );
                if let SampleOutcome::Evaluated { gesture, movement } = self.handle_sample(sample) {
                    let moving = if movement.is_some() { "dispatched" } else { "held" };
                    event!("Frame classified as {gesture}, movement {moving}");
                }
            }
        }
    }

    /// Evaluates one sample: gesture and state machine first, then movement if flying.
    pub fn handle_sample(&mut self, sample: Sample) -> SampleOutcome {
        let primary = sample.primary_hand().copied();
        let frame_id = sample.frame_id();
        self.latest_sample = Some(sample);
        let Some(hand) = primary else {
            event!("Frame {frame_id} without hands");
            return SampleOutcome::NoHand;
        };
        if self.hand.is_none_or(|last| last.id() != hand.id()) {
            log!("Tracking hand {}", hand.id());
        }
        self.hand = Some(hand);

        let gesture = Gesture::classify(hand.fingers_extended());
        if let Some(transition) = self.state_machine.apply(gesture) {
            self.dispatch_transition(transition);
        }

        let movement = (self.state() == FlightState::Flying).then(|| self.dispatch_movement(&hand));
        SampleOutcome::Evaluated { gesture, movement }
    }

    /// Waits for the next take-off or landing completion and applies it.
    pub async fn process_next_completion(&mut self) {
        if let Some(signal) = self.completion_rx.recv().await {
            self.state_machine.complete(&signal);
        }
    }

    fn dispatch_transition(&self, transition: Transition) {
        let actuator = Arc::clone(&self.actuator);
        let completion_tx = self.completion_tx.clone();
        let timeout = self.state_machine.policy().timeout;
        tokio::spawn(async move {
            let command = actuator.execute(transition.command());
            let result = match timeout {
                Some(dt) => tokio::time::timeout(dt, command).await.unwrap_or(Err(ActuatorError::Timeout)),
                None => command.await,
            };
            let _ = completion_tx.send(TransitionSignal::new(transition, result));
        });
    }

    fn dispatch_movement(&self, hand: &Hand) -> JoinHandle<()> {
        let [pitch, roll, yaw] = MovementMapper::map(hand.pitch(), hand.roll(), hand.yaw());
        event!("Dispatching {pitch}, {roll}, {yaw}");
        let actuator = Arc::clone(&self.actuator);
        tokio::spawn(async move {
            let results = futures::join!(
                actuator.execute(pitch.into()),
                actuator.execute(roll.into()),
                actuator.execute(yaw.into()),
            );
            for (command, result) in [(pitch, results.0), (roll, results.1), (yaw, results.2)] {
                if let Err(e) = result {
                    error!("{} command {command} failed with {e:?}", command.axis());
                }
            }
        })
    }
}
