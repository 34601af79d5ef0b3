use crate::error::HardwareError;
use crate::servo::{Servo, Toggle, check_position};
use crate::status::ServoStatus;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Minimum time between two accepted toggles.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(250);

/// Toggles a positional servo between an enabled and a disabled position.
pub struct ToggleServo {
    servo: Arc<dyn Servo>,
    enabled: f64,
    disabled: f64,
    wait: Duration,
    status: ServoStatus,
    last_toggle: Instant,
}

impl ToggleServo {
    /// The servo starts out as [`ServoStatus::Enabled`] without being moved.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::Position`] if a position is outside `[0, 1]`.
    pub fn new(servo: Arc<dyn Servo>, enabled: f64, disabled: f64) -> Result<Self, HardwareError> {
        Ok(Self {
            servo,
            enabled: check_position("enabled", enabled)?,
            disabled: check_position("disabled", disabled)?,
            wait: DEFAULT_WAIT,
            status: ServoStatus::Enabled,
            last_toggle: Instant::now(),
        })
    }

    #[must_use]
    pub const fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    #[must_use]
    pub const fn enabled_position(&self) -> f64 {
        self.enabled
    }

    #[must_use]
    pub const fn disabled_position(&self) -> f64 {
        self.disabled
    }

    #[must_use]
    pub fn servo(&self) -> &Arc<dyn Servo> {
        &self.servo
    }

    /// Moves to `position` and marks the servo as resting.
    pub(crate) fn rest_at(&mut self, position: f64) {
        self.servo.set_position(position);
        self.status = self.status.to_rest();
        debug!(target: "tilt::hardware", position, status = %self.status, "Servo at rest");
    }
}

impl Toggle for ToggleServo {
    fn status(&self) -> ServoStatus {
        self.status
    }

    fn toggle(&mut self) -> bool {
        if self.last_toggle.elapsed() < self.wait {
            return false;
        }
        self.last_toggle = Instant::now();

        if self.status.next_state_is_off() {
            self.toggle_off();
        } else {
            self.toggle_on();
        }
        true
    }

    fn toggle_on(&mut self) {
        self.servo.set_position(self.enabled);
        self.status = ServoStatus::Enabled;
    }

    fn toggle_off(&mut self) {
        self.servo.set_position(self.disabled);
        self.status = ServoStatus::Disabled;
    }
}

impl fmt::Debug for ToggleServo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleServo")
            .field("enabled", &self.enabled)
            .field("disabled", &self.disabled)
            .field("wait", &self.wait)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
