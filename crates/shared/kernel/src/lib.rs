//! Unit catalog, registration flow and the application [`Context`].
//!
//! Units are registered explicitly at start-up, then filtered, named,
//! instantiated and configured:
//!
//! ```rust
//! use tilt_kernel::{Context, Settings};
//! use tilt_store::{ConfigurationRegistry, MemorySource};
//!
//! pub trait Program {}
//!
//! #[derive(Default, tilt_derive::Bindable, tilt_derive::Unit)]
//! #[unit(register = "Park", implements(Program))]
//! pub struct Park {
//!     #[configurable]
//!     pub wait_ms: i32,
//! }
//! impl Program for Park {}
//!
//! let settings = Settings { blacklist: Vec::new(), ..Settings::default() };
//! let mut context = Context::builder()
//!     .settings(settings)
//!     .registry(ConfigurationRegistry::new(MemorySource::with_contents("[autonomous]\nPark.wait_ms=i_250\n")))
//!     .register::<Park>()
//!     .build()
//!     .unwrap();
//!
//! let mut names = Vec::new();
//! let units = context.register_units::<dyn Program>(&mut |name: &str, _: &tilt_kernel::UnitDescriptor| {
//!     names.push(name.to_owned());
//! });
//!
//! assert_eq!(names, ["Park"]);
//! let park = units[0].instance.as_any().downcast_ref::<Park>().unwrap();
//! assert_eq!(park.wait_ms, 250);
//! ```
pub mod catalog;
pub mod context;
pub mod error;
pub mod naming;
pub mod registrar;
pub mod settings;
pub mod unit;

pub use catalog::{Catalog, CatalogBuilder, UnitQuery};
pub use context::{Context, ContextBuilder};
pub use error::{KernelError, KernelErrorExt};
pub use naming::{DisplayName, NAME_SEPARATOR, NameFallback, resolve_display_name};
pub use registrar::{Registrar, RegisteredUnit, RegistrationSink};
pub use settings::{Settings, load_settings};
pub use tilt_domain::Capabilities;
pub use unit::{Unit, UnitDescriptor, UnitInstance};
