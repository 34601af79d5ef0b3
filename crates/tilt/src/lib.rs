//! Facade crate for the `tilt` configuration and binding crates.
//! Re-exports the building blocks and offers a prelude.
//! Keep this crate thin: it composes other crates, it does not implement behaviour.
//!
//! ## Usage
//! - Add `tilt` with the desired feature flags (`hardware`, `logger`).
//! - Call [`bootstrap`] to load settings and start a [`ContextBuilder`](kernel::ContextBuilder).

use std::path::Path;

pub use tilt_binder as binder;
#[cfg(feature = "derive")]
pub use tilt_derive as derive;
pub use tilt_domain as domain;
#[cfg(feature = "hardware")]
pub use tilt_hardware as hardware;
pub use tilt_kernel as kernel;
#[cfg(feature = "logger")]
pub use tilt_logger as logger;
pub use tilt_store as store;

/// Build-time enabled features (by Cargo feature).
pub mod features {
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "derive")]
        "derive",
        #[cfg(feature = "hardware")]
        "hardware",
        #[cfg(feature = "logger")]
        "logger",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

pub mod prelude {
    pub use tilt_binder::{Bindable, BindReport, DeviceMap, DeviceRegistry, FieldBinder};
    #[cfg(feature = "derive")]
    pub use tilt_derive::{Bindable, Unit};
    pub use tilt_domain::{Capabilities, ConfigValue, DecodedValue, TaggedValue, ValueTag};
    #[cfg(feature = "hardware")]
    pub use tilt_hardware::{RestScheduler, RestingToggleServo, Servo, ServoStatus, Toggle, ToggleServo};
    pub use tilt_kernel::{Context, KernelError, RegistrationSink, Settings, Unit, UnitDescriptor};
    pub use tilt_store::{ConfigDocument, ConfigSource, ConfigurationRegistry, ProgramConfig, StoreError};
}

/// Loads settings (file at `settings_path` plus `TILT__*` overrides) and
/// returns a context builder seeded with them.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded.
pub fn bootstrap(settings_path: Option<&Path>) -> Result<kernel::ContextBuilder, kernel::KernelError> {
    let settings = kernel::load_settings(settings_path)?;
    Ok(kernel::Context::builder().settings(settings))
}
