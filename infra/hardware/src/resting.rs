use crate::error::HardwareError;
use crate::scheduler::{JobId, RestScheduler};
use crate::servo::{Servo, Toggle, check_position};
use crate::status::ServoStatus;
use crate::toggle::ToggleServo;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A toggle servo that returns to a rest position once the toggle wait has
/// passed.
///
/// Each accepted toggle schedules a return-to-rest job under the servo's
/// device name; a newer toggle replaces the pending job. Cancelling only ever
/// touches the job this instance scheduled last, so another servo sharing the
/// device name keeps its own.
pub struct RestingToggleServo {
    device: String,
    rest: f64,
    inner: Arc<Mutex<ToggleServo>>,
    scheduler: RestScheduler,
    job: Option<JobId>,
}

impl RestingToggleServo {
    /// Creates the servo and moves it to `rest` right away.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::Position`] if a position is outside `[0, 1]`.
    pub fn new(
        device: impl Into<String>,
        mut toggle: ToggleServo,
        rest: f64,
        scheduler: RestScheduler,
    ) -> Result<Self, HardwareError> {
        let rest = check_position("rest", rest)?;
        toggle.rest_at(rest);

        Ok(Self {
            device: device.into(),
            rest,
            inner: Arc::new(Mutex::new(toggle)),
            scheduler,
            job: None,
        })
    }

    /// Shorthand for a servo with the default toggle wait.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::Position`] if a position is outside `[0, 1]`.
    pub fn with_positions(
        device: impl Into<String>,
        servo: Arc<dyn Servo>,
        enabled: f64,
        disabled: f64,
        rest: f64,
        scheduler: RestScheduler,
    ) -> Result<Self, HardwareError> {
        Self::new(device, ToggleServo::new(servo, enabled, disabled)?, rest, scheduler)
    }

    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    #[must_use]
    pub const fn rest_position(&self) -> f64 {
        self.rest
    }

    /// Moves to the rest position now, dropping any pending rest job.
    pub fn toggle_rest(&mut self) {
        self.cancel_own_job();
        self.inner.lock().rest_at(self.rest);
    }

    fn cancel_own_job(&mut self) {
        if let Some(job) = self.job.take() {
            self.scheduler.cancel_job(&self.device, job);
        }
    }
}

impl Toggle for RestingToggleServo {
    fn status(&self) -> ServoStatus {
        self.inner.lock().status()
    }

    fn toggle(&mut self) -> bool {
        let (toggled, wait) = {
            let mut inner = self.inner.lock();
            (inner.toggle(), inner.wait())
        };
        if !toggled {
            return false;
        }

        let inner = Arc::clone(&self.inner);
        let rest = self.rest;
        self.job = Some(self.scheduler.schedule(&self.device, wait, move || inner.lock().rest_at(rest)));
        debug!(target: "tilt::hardware", device = %self.device, ?wait, "Rest scheduled");
        true
    }

    fn toggle_on(&mut self) {
        self.inner.lock().toggle_on();
    }

    fn toggle_off(&mut self) {
        self.inner.lock().toggle_off();
    }
}

impl Drop for RestingToggleServo {
    fn drop(&mut self) {
        self.cancel_own_job();
    }
}

impl fmt::Debug for RestingToggleServo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestingToggleServo")
            .field("device", &self.device)
            .field("rest", &self.rest)
            .field("job", &self.job)
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}
