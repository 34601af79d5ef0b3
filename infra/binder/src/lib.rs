//! Marker-driven field binding.
//!
//! A [`Bindable`] value lists its fields together with mutable slots. The
//! [`FieldBinder`] walks the fields carrying a marker and fills them:
//!
//! * `#[configurable]` fields get the value stored under their key in a
//!   program's config, healing the stored value when its kind is wrong;
//! * `#[hardware]` fields get the device registered under their key in a
//!   [`DeviceRegistry`].
//!
//! ```rust
//! use std::sync::Arc;
//! use tilt_binder::{DeviceMap, FieldBinder};
//! use tilt_store::{ConfigurationRegistry, MemorySource};
//!
//! #[derive(Debug)]
//! pub struct Claw;
//!
//! #[derive(Default, tilt_derive::Bindable)]
//! pub struct Auto {
//!     #[configurable]
//!     pub delay: f64,
//!     #[hardware(name = "claw_servo")]
//!     pub claw: Option<Arc<Claw>>,
//! }
//!
//! let mut registry = ConfigurationRegistry::new(MemorySource::with_contents(
//!     "[autonomous]\nAuto.delay=d_1.5\n\n",
//! ));
//! let mut devices = DeviceMap::new();
//! devices.insert("claw_servo", Claw);
//!
//! let mut auto = Auto::default();
//! let binder = FieldBinder::new();
//! binder.bind_config(&mut registry, "Auto", &mut auto);
//! binder.bind_devices(&devices, &mut auto);
//!
//! assert!((auto.delay - 1.5).abs() < f64::EPSILON);
//! assert!(auto.claw.is_some());
//! ```

mod binder;
mod device;
mod field;
mod filter;

pub use binder::{BindReport, FieldBinder, SkipReason};
pub use device::{DeviceHandle, DeviceMap, DeviceRegistry, DeviceSlot};
pub use field::{Bindable, BindingTarget, Field, FieldKind, Marker, MarkerKind, Slot};
pub use filter::{FieldFilter, discover};
pub use tilt_domain::Capabilities;
