use crate::catalog::UnitQuery;
use crate::naming::resolve_display_name;
use crate::unit::{UnitDescriptor, UnitInstance};
use std::fmt;
use tilt_binder::{BindReport, FieldBinder};
use tilt_store::ConfigurationRegistry;
use tracing::{info, warn};

/// Receives every unit under its decided display name (the host's program list).
pub trait RegistrationSink {
    fn register(&mut self, name: &str, descriptor: &UnitDescriptor);
}

impl<F: FnMut(&str, &UnitDescriptor)> RegistrationSink for F {
    fn register(&mut self, name: &str, descriptor: &UnitDescriptor) {
        self(name, descriptor);
    }
}

/// A unit that went through registration and config binding.
pub struct RegisteredUnit {
    pub name: String,
    pub descriptor: UnitDescriptor,
    pub instance: Box<dyn UnitInstance>,
    pub report: BindReport,
}

impl fmt::Debug for RegisteredUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredUnit")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

/// Names, registers, instantiates and configures units.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registrar<'a> {
    reserved: &'a [String],
    binder: FieldBinder,
}

impl<'a> Registrar<'a> {
    #[must_use]
    pub fn new(reserved: &'a [String]) -> Self {
        Self { reserved, binder: FieldBinder::new() }
    }

    #[must_use]
    pub const fn binder(mut self, binder: FieldBinder) -> Self {
        self.binder = binder;
        self
    }

    /// Runs the registration flow for one unit.
    ///
    /// Returns `None` for units that cannot be instantiated; they are still
    /// handed to `sink`.
    pub fn register(
        &self,
        descriptor: &UnitDescriptor,
        registry: &mut ConfigurationRegistry,
        sink: &mut dyn RegistrationSink,
    ) -> Option<RegisteredUnit> {
        let requested = descriptor.registration().unwrap_or_default();
        let resolved = resolve_display_name(requested, descriptor.simple_name(), self.reserved);
        if let Some(reason) = resolved.fallback {
            warn!(
                target: "tilt::registrar",
                unit = descriptor.type_path(),
                requested,
                name = %resolved.name,
                %reason,
                "Falling back to the type name"
            );
        }

        info!(target: "tilt::registrar", unit = descriptor.type_path(), name = %resolved.name, "Registered unit");
        sink.register(&resolved.name, descriptor);

        let Some(mut instance) = descriptor.instantiate() else {
            warn!(target: "tilt::registrar", unit = descriptor.type_path(), "Unit is not instantiable");
            return None;
        };
        let report = self.binder.bind_config(registry, &resolved.name, instance.as_bindable());

        Some(RegisteredUnit { name: resolved.name, descriptor: descriptor.clone(), instance, report })
    }

    /// Registers every unit selected by `query`.
    pub fn register_all(
        &self,
        query: UnitQuery<'_>,
        registry: &mut ConfigurationRegistry,
        sink: &mut dyn RegistrationSink,
    ) -> Vec<RegisteredUnit> {
        query.iter().filter_map(|descriptor| self.register(descriptor, registry, sink)).collect()
    }
}
