use super::{
    controller::{FlightController, SampleOutcome},
    flight_state::{FailurePolicy, FlightState, Transition, TransitionPolicy},
    gesture::Gesture,
    movement::{Axis, MovementCommand, MovementMapper},
    signal::TransitionSignal,
    state_machine::FlightStateMachine,
};
use crate::drone::{ActuatorError, DroneActuator, DroneCommand};
use crate::motion::{Hand, MotionEvent, Sample};
use async_trait::async_trait;
use rand::Rng;
use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;

const OPEN: [bool; 5] = [true; 5];
const FIST: [bool; 5] = [false; 5];
const POINTING: [bool; 5] = [false, true, false, false, false];

/// Records every command. Take-off and landing only resolve once a permit is released.
struct MockActuator {
    calls: Mutex<Vec<DroneCommand>>,
    transition_gate: Semaphore,
    fail_transitions: AtomicBool,
    failing: Mutex<HashSet<DroneCommand>>,
}

impl MockActuator {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            transition_gate: Semaphore::new(0),
            fail_transitions: AtomicBool::new(false),
            failing: Mutex::new(HashSet::new()),
        }
    }

    fn release(&self, n: usize) { self.transition_gate.add_permits(n); }

    fn calls(&self) -> Vec<DroneCommand> { self.calls.lock().unwrap().clone() }

    fn count(&self, command: DroneCommand) -> usize {
        self.calls().into_iter().filter(|c| *c == command).count()
    }
}

#[async_trait]
impl DroneActuator for MockActuator {
    async fn init(&self) -> Result<(), ActuatorError> { Ok(()) }

    async fn execute(&self, command: DroneCommand) -> Result<(), ActuatorError> {
        self.calls.lock().unwrap().push(command);
        if command.is_transition() {
            self.transition_gate.acquire().await.map_err(|_| ActuatorError::Internal)?.forget();
            if self.fail_transitions.load(Ordering::SeqCst) {
                return Err(ActuatorError::Rejected(String::from("mock transition failure")));
            }
        }
        let fails = self.failing.lock().unwrap().contains(&command);
        if fails { Err(ActuatorError::NoConnection) } else { Ok(()) }
    }

    fn type_name(&self) -> &'static str { "MockActuator" }
}

fn sample(fingers: [bool; 5], pitch: f32, roll: f32, yaw: f32) -> Sample {
    Sample::new(1, vec![Hand::new(1, fingers, pitch, roll, yaw)])
}

fn setup(policy: TransitionPolicy) -> (FlightController, Arc<MockActuator>) {
    let mock = Arc::new(MockActuator::new());
    let actuator: Arc<dyn DroneActuator> = Arc::clone(&mock) as Arc<dyn DroneActuator>;
    (FlightController::new(actuator, policy), mock)
}

async fn take_off(controller: &mut FlightController, mock: &MockActuator) {
    mock.release(1);
    controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    controller.process_next_completion().await;
    assert_eq!(controller.state(), FlightState::Flying);
}

async fn movement_of(controller: &mut FlightController, sample: Sample) {
    match controller.handle_sample(sample) {
        SampleOutcome::Evaluated { movement: Some(handle), .. } => handle.await.unwrap(),
        other => panic!("expected movement dispatch, got {other:?}"),
    }
}

#[test]
fn test_gesture_classification() {
    assert_eq!(Gesture::classify(&OPEN), Gesture::AllExtended);
    assert_eq!(Gesture::classify(&FIST), Gesture::AllRetracted);
    assert_eq!(Gesture::classify(&POINTING), Gesture::Ambiguous);
    assert_eq!(Gesture::AllExtended.intent(), Some(Transition::TakeOff));
    assert_eq!(Gesture::AllRetracted.intent(), Some(Transition::Land));
    assert_eq!(Gesture::Ambiguous.intent(), None);

    let ambiguous = (0u8..32)
        .map(|bits| std::array::from_fn::<bool, 5, _>(|i| bits & (1 << i) != 0))
        .filter(|f| Gesture::classify(f) == Gesture::Ambiguous)
        .count();
    assert_eq!(ambiguous, 30);
}

#[test]
fn test_movement_mapping() {
    assert_eq!(
        MovementMapper::map(-0.7, 0.1, 0.6),
        [MovementCommand::MoveForward, MovementCommand::ResetRoll, MovementCommand::SpinRight]
    );
    assert_eq!(
        MovementMapper::map(0.0, 0.0, 0.0),
        [MovementCommand::ResetPitch, MovementCommand::ResetRoll, MovementCommand::ResetYaw]
    );
    assert_eq!(
        MovementMapper::map(0.9, -0.51, -3.0),
        [MovementCommand::MoveBack, MovementCommand::MoveLeft, MovementCommand::SpinLeft]
    );
    assert_eq!(MovementMapper::map_axis(Axis::Roll, 0.51), MovementCommand::MoveRight);
}

#[test]
fn test_dead_zone_bounds_are_inclusive() {
    for axis in [Axis::Pitch, Axis::Roll, Axis::Yaw] {
        for bound in [-MovementMapper::DEAD_ZONE, MovementMapper::DEAD_ZONE] {
            let command = MovementMapper::map_axis(axis, bound);
            assert_eq!(command.axis(), axis);
            assert!(matches!(
                command,
                MovementCommand::ResetPitch | MovementCommand::ResetRoll | MovementCommand::ResetYaw
            ));
        }
    }
    assert_eq!(MovementMapper::map_axis(Axis::Pitch, f32::NAN), MovementCommand::ResetPitch);
}

#[test]
fn test_random_poses_inside_dead_zone_reset() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let (p, r, y) = (
            rng.random_range(-0.5f32..=0.5),
            rng.random_range(-0.5f32..=0.5),
            rng.random_range(-0.5f32..=0.5),
        );
        assert_eq!(
            MovementMapper::map(p, r, y),
            [MovementCommand::ResetPitch, MovementCommand::ResetRoll, MovementCommand::ResetYaw]
        );
    }
}

#[test]
fn test_state_machine_guards() {
    let mut fsm = FlightStateMachine::new(TransitionPolicy::default());
    assert_eq!(fsm.apply(Gesture::AllRetracted), None);
    assert_eq!(fsm.apply(Gesture::Ambiguous), None);
    assert_eq!(fsm.apply(Gesture::AllExtended), Some(Transition::TakeOff));
    assert_eq!(fsm.state(), FlightState::TakingOff);
    assert_eq!(fsm.apply(Gesture::AllExtended), None);
    assert_eq!(fsm.apply(Gesture::AllRetracted), None);

    let done = TransitionSignal::new(Transition::TakeOff, Ok(()));
    assert_eq!(fsm.complete(&done), FlightState::Flying);
    assert_eq!(fsm.apply(Gesture::AllExtended), None);
    assert_eq!(fsm.apply(Gesture::AllRetracted), Some(Transition::Land));
    assert_eq!(fsm.state(), FlightState::Landing);
    assert_eq!(fsm.apply(Gesture::AllExtended), None);
    assert_eq!(fsm.complete(&TransitionSignal::new(Transition::Land, Ok(()))), FlightState::Landed);
}

#[test]
fn test_stale_completion_is_discarded() {
    let mut fsm = FlightStateMachine::new(TransitionPolicy::default());
    assert_eq!(fsm.complete(&TransitionSignal::new(Transition::TakeOff, Ok(()))), FlightState::Landed);
    assert_eq!(fsm.complete(&TransitionSignal::new(Transition::Land, Ok(()))), FlightState::Landed);
}

#[test]
fn test_failure_policies() {
    let failed = || TransitionSignal::new(Transition::TakeOff, Err(ActuatorError::Timeout));

    let mut hold = FlightStateMachine::new(TransitionPolicy::default());
    hold.apply(Gesture::AllExtended);
    assert_eq!(hold.complete(&failed()), FlightState::TakingOff);
    assert_eq!(hold.apply(Gesture::AllExtended), None);

    let revert_policy = TransitionPolicy { failure: FailurePolicy::Revert, timeout: None };
    let mut revert = FlightStateMachine::new(revert_policy);
    revert.apply(Gesture::AllExtended);
    assert_eq!(revert.complete(&failed()), FlightState::Landed);
    assert_eq!(revert.apply(Gesture::AllExtended), Some(Transition::TakeOff));
}

#[tokio::test]
async fn test_ambiguous_gestures_keep_state() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    for bits in 1u8..31 {
        let fingers = std::array::from_fn::<bool, 5, _>(|i| bits & (1 << i) != 0);
        controller.handle_sample(sample(fingers, 0.0, 0.0, 0.0));
        assert_eq!(controller.state(), FlightState::Landed);
    }
    take_off(&mut controller, &mock).await;
    for bits in 1u8..31 {
        let fingers = std::array::from_fn::<bool, 5, _>(|i| bits & (1 << i) != 0);
        controller.handle_sample(sample(fingers, 0.0, 0.0, 0.0));
        assert_eq!(controller.state(), FlightState::Flying);
    }
    assert_eq!(mock.count(DroneCommand::TakeOff), 1);
    assert_eq!(mock.count(DroneCommand::Land), 0);
}

#[tokio::test]
async fn test_take_off_sequence() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    let outcome = controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    assert!(matches!(
        outcome,
        SampleOutcome::Evaluated { gesture: Gesture::AllExtended, movement: None }
    ));
    assert_eq!(controller.state(), FlightState::TakingOff);

    // Repeated intents while taking off must not reach the actuator.
    controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    controller.handle_sample(sample(FIST, 0.0, 0.0, 0.0));
    assert_eq!(controller.state(), FlightState::TakingOff);

    mock.release(1);
    controller.process_next_completion().await;
    assert_eq!(controller.state(), FlightState::Flying);
    assert_eq!(mock.calls(), vec![DroneCommand::TakeOff]);
}

#[tokio::test]
async fn test_land_sequence() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    take_off(&mut controller, &mock).await;

    let outcome = controller.handle_sample(sample(FIST, -0.9, 0.9, 0.9));
    assert!(matches!(
        outcome,
        SampleOutcome::Evaluated { gesture: Gesture::AllRetracted, movement: None }
    ));
    assert_eq!(controller.state(), FlightState::Landing);
    controller.handle_sample(sample(FIST, 0.0, 0.0, 0.0));
    controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    assert_eq!(controller.state(), FlightState::Landing);

    mock.release(1);
    controller.process_next_completion().await;
    assert_eq!(controller.state(), FlightState::Landed);
    assert_eq!(mock.calls(), vec![DroneCommand::TakeOff, DroneCommand::Land]);
}

#[tokio::test]
async fn test_flying_dispatches_one_command_per_axis() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    take_off(&mut controller, &mock).await;

    movement_of(&mut controller, sample(OPEN, -0.7, 0.1, 0.6)).await;
    let calls = mock.calls();
    assert_eq!(
        calls[1..].iter().copied().collect::<HashSet<_>>(),
        HashSet::from([DroneCommand::MoveForward, DroneCommand::ResetRoll, DroneCommand::SpinRight])
    );
    assert_eq!(calls.len(), 4);

    movement_of(&mut controller, sample(POINTING, 0.0, 0.0, 0.0)).await;
    let calls = mock.calls();
    assert_eq!(
        calls[4..].iter().copied().collect::<HashSet<_>>(),
        HashSet::from([DroneCommand::ResetPitch, DroneCommand::ResetRoll, DroneCommand::ResetYaw])
    );

    movement_of(&mut controller, sample(POINTING, 0.5, -0.5, 0.5)).await;
    assert_eq!(mock.calls()[7..], [DroneCommand::ResetPitch, DroneCommand::ResetRoll, DroneCommand::ResetYaw]);
}

#[tokio::test]
async fn test_failing_axis_does_not_block_others() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    take_off(&mut controller, &mock).await;
    mock.failing.lock().unwrap().insert(DroneCommand::MoveForward);

    movement_of(&mut controller, sample(OPEN, -0.9, 0.9, -0.9)).await;
    let calls = mock.calls();
    assert!(calls.contains(&DroneCommand::MoveForward));
    assert!(calls.contains(&DroneCommand::MoveRight));
    assert!(calls.contains(&DroneCommand::SpinLeft));
    assert_eq!(controller.state(), FlightState::Flying);
}

#[tokio::test]
async fn test_no_movement_outside_flying() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    let outcome = controller.handle_sample(sample(POINTING, -0.9, 0.9, 0.9));
    assert!(matches!(outcome, SampleOutcome::Evaluated { movement: None, .. }));

    controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    let outcome = controller.handle_sample(sample(POINTING, -0.9, 0.9, 0.9));
    assert!(matches!(outcome, SampleOutcome::Evaluated { movement: None, .. }));

    mock.release(1);
    controller.process_next_completion().await;
    controller.handle_sample(sample(FIST, 0.0, 0.0, 0.0));
    let outcome = controller.handle_sample(sample(POINTING, -0.9, 0.9, 0.9));
    assert!(matches!(outcome, SampleOutcome::Evaluated { movement: None, .. }));

    tokio::task::yield_now().await;
    assert!(mock.calls().iter().all(|c| c.is_transition()));
}

#[tokio::test]
async fn test_sample_without_hands_is_skipped() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    take_off(&mut controller, &mock).await;
    movement_of(&mut controller, sample(POINTING, 0.1, 0.2, 0.3)).await;
    let hand_before = *controller.hand().unwrap();
    let calls_before = mock.calls();

    let outcome = controller.handle_sample(Sample::new(77, Vec::new()));
    assert!(matches!(outcome, SampleOutcome::NoHand));
    assert_eq!(controller.state(), FlightState::Flying);
    assert_eq!(controller.hand(), Some(&hand_before));
    assert_eq!(controller.latest_sample().unwrap().frame_id(), 77);
    tokio::task::yield_now().await;
    assert_eq!(mock.calls(), calls_before);
}

#[tokio::test]
async fn test_only_first_hand_is_used() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    let frame = Sample::new(3, vec![Hand::new(1, POINTING, 0.0, 0.0, 0.0), Hand::new(2, OPEN, 0.0, 0.0, 0.0)]);
    controller.handle_sample(frame);
    assert_eq!(controller.state(), FlightState::Landed);
    assert_eq!(controller.hand().unwrap().id(), 1);
    tokio::task::yield_now().await;
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_failed_take_off_holds_by_default() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    mock.fail_transitions.store(true, Ordering::SeqCst);
    mock.release(1);
    controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    controller.process_next_completion().await;
    assert_eq!(controller.state(), FlightState::TakingOff);

    controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    tokio::task::yield_now().await;
    assert_eq!(mock.count(DroneCommand::TakeOff), 1);
}

#[tokio::test]
async fn test_failed_take_off_reverts_when_configured() {
    let policy = TransitionPolicy { failure: FailurePolicy::Revert, timeout: None };
    let (mut controller, mock) = setup(policy);
    mock.fail_transitions.store(true, Ordering::SeqCst);
    mock.release(1);
    controller.handle_sample(sample(OPEN, 0.0, 0.0, 0.0));
    controller.process_next_completion().await;
    assert_eq!(controller.state(), FlightState::Landed);

    mock.fail_transitions.store(false, Ordering::SeqCst);
    take_off(&mut controller, &mock).await;
    assert_eq!(mock.count(DroneCommand::TakeOff), 2);
}

#[tokio::test]
async fn test_hanging_landing_times_out() {
    let policy = TransitionPolicy { failure: FailurePolicy::Revert, timeout: Some(Duration::from_millis(50)) };
    let (mut controller, mock) = setup(policy);
    take_off(&mut controller, &mock).await;

    controller.handle_sample(sample(FIST, 0.0, 0.0, 0.0));
    assert_eq!(controller.state(), FlightState::Landing);
    controller.process_next_completion().await;
    assert_eq!(controller.state(), FlightState::Flying);
}

#[tokio::test]
async fn test_run_consumes_motion_events() {
    let (mut controller, mock) = setup(TransitionPolicy::default());
    mock.release(1);
    let (tx, rx) = mpsc::channel(8);
    let c_tok = CancellationToken::new();

    let feed = async move {
        tx.send(MotionEvent::Connected).await.unwrap();
        tx.send(MotionEvent::Frame(sample(OPEN, 0.0, 0.0, 0.0))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(MotionEvent::Frame(sample(OPEN, -0.8, 0.0, 0.0))).await.unwrap();
        tx.send(MotionEvent::Frame(Sample::new(9, Vec::new()))).await.unwrap();
        tx.send(MotionEvent::Disconnected).await.unwrap();
    };
    tokio::join!(controller.run(rx, c_tok), feed);
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(controller.state(), FlightState::Flying);
    assert_eq!(controller.latest_sample().unwrap().frame_id(), 9);
    assert!(mock.calls().contains(&DroneCommand::MoveForward));
}

#[tokio::test]
async fn test_run_stops_on_cancellation() {
    let (mut controller, _mock) = setup(TransitionPolicy::default());
    let (_tx, rx) = mpsc::channel::<MotionEvent>(1);
    let c_tok = CancellationToken::new();
    c_tok.cancel();
    tokio::time::timeout(Duration::from_secs(1), controller.run(rx, c_tok)).await.unwrap();
    assert_eq!(controller.state(), FlightState::Landed);
}
