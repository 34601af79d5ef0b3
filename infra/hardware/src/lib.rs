//! Toggle servos for bound hardware.
//!
//! [`ToggleServo`] flips between two positions and ignores toggles that come
//! faster than its wait time. [`RestingToggleServo`] additionally returns to a
//! rest position through a [`RestScheduler`] job keyed by device name.
pub mod error;
pub mod resting;
pub mod scheduler;
pub mod servo;
pub mod status;
pub mod toggle;

pub use error::{HardwareError, HardwareErrorExt};
pub use resting::RestingToggleServo;
pub use scheduler::{JobId, RestScheduler};
pub use servo::{Servo, Toggle};
pub use status::ServoStatus;
pub use toggle::{DEFAULT_WAIT, ToggleServo};
