use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tilt_binder::{DeviceMap, FieldBinder};
use tilt_derive::Bindable;
use tilt_hardware::{HardwareError, RestScheduler, RestingToggleServo, Servo, ServoStatus, Toggle, ToggleServo};

#[derive(Debug, Default)]
pub struct RecordingServo {
    moves: Mutex<Vec<f64>>,
}

impl RecordingServo {
    fn moves(&self) -> Vec<f64> {
        self.moves.lock().clone()
    }
}

impl Servo for RecordingServo {
    fn set_position(&self, position: f64) {
        self.moves.lock().push(position);
    }

    fn position(&self) -> f64 {
        self.moves.lock().last().copied().unwrap_or_default()
    }
}

const WAIT: Duration = Duration::from_millis(250);

#[tokio::test(start_paused = true)]
async fn toggles_are_rate_limited() {
    let servo = Arc::new(RecordingServo::default());
    let mut toggle = ToggleServo::new(servo.clone(), 0.9, 0.1).unwrap();
    assert_eq!(toggle.status(), ServoStatus::Enabled);

    assert!(!toggle.toggle());
    assert!(servo.moves().is_empty());

    tokio::time::advance(WAIT).await;
    assert!(toggle.toggle());
    assert_eq!(toggle.status(), ServoStatus::Disabled);

    tokio::time::advance(Duration::from_millis(100)).await;
    assert!(!toggle.toggle());

    tokio::time::advance(Duration::from_millis(150)).await;
    assert!(toggle.toggle());
    assert_eq!(toggle.status(), ServoStatus::Enabled);
    assert_eq!(servo.moves(), [0.1, 0.9]);
}

#[tokio::test(start_paused = true)]
async fn explicit_moves_ignore_the_wait() {
    let servo = Arc::new(RecordingServo::default());
    let mut toggle = ToggleServo::new(servo.clone(), 1.0, 0.0).unwrap();

    toggle.toggle_off();
    toggle.toggle_on();

    assert_eq!(servo.moves(), [0.0, 1.0]);
    assert_eq!(toggle.status(), ServoStatus::Enabled);
}

#[tokio::test(start_paused = true)]
async fn resting_servo_returns_to_rest() {
    let servo = Arc::new(RecordingServo::default());
    let scheduler = RestScheduler::current().unwrap();
    let mut claw = RestingToggleServo::with_positions("claw", servo.clone(), 1.0, 0.0, 0.5, scheduler.clone()).unwrap();

    assert_eq!(claw.status(), ServoStatus::RestEnabled);
    assert!((servo.position() - 0.5).abs() < f64::EPSILON);

    tokio::time::advance(WAIT).await;
    assert!(claw.toggle());
    assert_eq!(claw.status(), ServoStatus::Disabled);
    assert!(scheduler.is_pending("claw"));

    tokio::time::sleep(WAIT + Duration::from_millis(1)).await;
    assert_eq!(claw.status(), ServoStatus::RestDisabled);
    assert_eq!(servo.moves(), [0.5, 0.0, 0.5]);

    tokio::time::advance(WAIT).await;
    assert!(claw.toggle());
    assert_eq!(claw.status(), ServoStatus::Enabled);
}

#[tokio::test(start_paused = true)]
async fn manual_rest_drops_the_pending_job() {
    let servo = Arc::new(RecordingServo::default());
    let scheduler = RestScheduler::current().unwrap();
    let mut claw = RestingToggleServo::with_positions("claw", servo.clone(), 1.0, 0.0, 0.5, scheduler.clone()).unwrap();

    tokio::time::advance(WAIT).await;
    assert!(claw.toggle());
    claw.toggle_rest();
    assert!(!scheduler.is_pending("claw"));

    tokio::time::sleep(WAIT * 2).await;
    assert_eq!(servo.moves(), [0.5, 0.0, 0.5]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_servo_cancels_its_job() {
    let servo = Arc::new(RecordingServo::default());
    let scheduler = RestScheduler::current().unwrap();
    let mut claw = RestingToggleServo::with_positions("claw", servo.clone(), 1.0, 0.0, 0.5, scheduler.clone()).unwrap();

    tokio::time::advance(WAIT).await;
    assert!(claw.toggle());
    drop(claw);

    tokio::time::sleep(WAIT * 2).await;
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(servo.moves(), [0.5, 0.0]);
}

#[tokio::test(start_paused = true)]
async fn dropping_a_servo_keeps_the_job_of_a_namesake() {
    let old_servo = Arc::new(RecordingServo::default());
    let new_servo = Arc::new(RecordingServo::default());
    let scheduler = RestScheduler::current().unwrap();
    let mut old = RestingToggleServo::with_positions("claw", old_servo.clone(), 1.0, 0.0, 0.5, scheduler.clone()).unwrap();
    let mut new = RestingToggleServo::with_positions("claw", new_servo.clone(), 1.0, 0.0, 0.5, scheduler.clone()).unwrap();

    tokio::time::advance(WAIT).await;
    assert!(old.toggle());
    assert!(new.toggle());
    drop(old);
    assert!(scheduler.is_pending("claw"));

    tokio::time::sleep(WAIT + Duration::from_millis(1)).await;
    assert_eq!(new_servo.moves(), [0.5, 0.0, 0.5]);
    assert_eq!(new.status(), ServoStatus::RestDisabled);
}

#[test]
fn positions_outside_the_unit_range_are_rejected() {
    let servo: Arc<dyn Servo> = Arc::new(RecordingServo::default());
    let err = ToggleServo::new(servo, 1.5, 0.0).unwrap_err();
    assert!(matches!(err, HardwareError::Position { .. }));
}

#[derive(Default, Bindable)]
pub struct Intake {
    #[hardware(name = "intake_servo")]
    pub servo: Option<Arc<RecordingServo>>,
}

#[tokio::test(start_paused = true)]
async fn bound_servo_drives_a_toggle() {
    let mut devices = DeviceMap::new();
    let device = devices.insert("intake_servo", RecordingServo::default());
    let mut intake = Intake::default();

    let report = FieldBinder::new().bind_devices(&devices, &mut intake);
    assert!(report.is_clean());

    let servo = intake.servo.clone().unwrap();
    let mut toggle = ToggleServo::new(servo, 0.75, 0.25).unwrap();
    tokio::time::advance(WAIT).await;
    assert!(toggle.toggle());
    assert_eq!(device.moves(), [0.25]);
}
