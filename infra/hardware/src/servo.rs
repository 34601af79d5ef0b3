use crate::error::HardwareError;
use crate::status::ServoStatus;

/// A positional servo driver, shared between the unit and background jobs.
pub trait Servo: Send + Sync {
    fn set_position(&self, position: f64);

    fn position(&self) -> f64;
}

/// A servo that flips between two positions.
pub trait Toggle {
    fn status(&self) -> ServoStatus;

    /// Flips to the other position. Returns `false` if the servo was toggled
    /// too recently.
    fn toggle(&mut self) -> bool;

    fn toggle_on(&mut self);

    fn toggle_off(&mut self);
}

/// Servo positions live in `[0, 1]`.
pub(crate) fn check_position(label: &'static str, position: f64) -> Result<f64, HardwareError> {
    if (0.0..=1.0).contains(&position) {
        Ok(position)
    } else {
        Err(HardwareError::Position { message: format!("{label} position {position} is outside [0, 1]").into(), context: None })
    }
}
