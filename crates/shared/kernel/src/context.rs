use crate::catalog::{Catalog, CatalogBuilder};
use crate::error::{KernelError, KernelErrorExt};
use crate::registrar::{Registrar, RegisteredUnit, RegistrationSink};
use crate::settings::Settings;
use crate::unit::{Unit, UnitDescriptor};
use tilt_binder::{BindReport, Bindable, FieldBinder};
use tilt_domain::Capabilities;
use tilt_store::ConfigurationRegistry;
use tracing::info;

/// Process-wide state, built once at start-up and passed by reference.
#[derive(Debug)]
pub struct Context {
    settings: Settings,
    registry: ConfigurationRegistry,
    catalog: Catalog,
    binder: FieldBinder,
}

impl Context {
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn registry(&self) -> &ConfigurationRegistry {
        &self.registry
    }

    pub const fn registry_mut(&mut self) -> &mut ConfigurationRegistry {
        &mut self.registry
    }

    /// Registers every public, instantiable, registration-marked unit that
    /// can be used as a `B`.
    pub fn register_units<B: ?Sized + 'static>(&mut self, sink: &mut dyn RegistrationSink) -> Vec<RegisteredUnit> {
        let query = self
            .catalog
            .query()
            .public()
            .instantiable()
            .with_marker(Capabilities::REGISTERED)
            .assignable_to::<B>();

        Registrar::new(&self.settings.reserved_names).binder(self.binder).register_all(
            query,
            &mut self.registry,
            sink,
        )
    }

    /// Binds the config fields of `unit` from the config of `program`.
    pub fn configure(&mut self, program: &str, unit: &mut dyn Bindable) -> BindReport {
        self.binder.bind_config(&mut self.registry, program, unit)
    }

    /// Persists the registry and ends the context.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Store`] if the document cannot be written.
    pub fn close(mut self) -> Result<(), KernelError> {
        self.registry.save().context("Failed to save config on close")?;
        info!(target: "tilt::context", location = %self.registry.source().location(), "Context closed");
        Ok(())
    }
}

/// Builder for [`Context`].
#[derive(Debug, Default)]
pub struct ContextBuilder {
    settings: Option<Settings>,
    registry: Option<ConfigurationRegistry>,
    catalog: CatalogBuilder,
    binder: FieldBinder,
}

impl ContextBuilder {
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Uses `registry` instead of opening `settings.config_path`.
    #[must_use]
    pub fn registry(mut self, registry: ConfigurationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn binder(mut self, binder: FieldBinder) -> Self {
        self.binder = binder;
        self
    }

    #[must_use]
    pub fn register<U: Unit>(mut self) -> Self {
        self.catalog = self.catalog.register::<U>();
        self
    }

    #[must_use]
    pub fn register_descriptor(mut self, descriptor: UnitDescriptor) -> Self {
        self.catalog = self.catalog.register_descriptor(descriptor);
        self
    }

    /// # Errors
    ///
    /// Returns [`KernelError::Validation`] if the config path is empty.
    pub fn build(self) -> Result<Context, KernelError> {
        let settings = self.settings.unwrap_or_default();

        let registry = match self.registry {
            Some(registry) => registry,
            None if settings.config_path.as_os_str().is_empty() => {
                return Err(KernelError::Validation {
                    message: "config_path must not be empty".into(),
                    context: None,
                });
            },
            None => ConfigurationRegistry::open(settings.config_path.clone()),
        };

        let catalog = self.catalog.blacklist(settings.blacklist.iter().cloned()).build();

        info!(
            target: "tilt::context",
            location = %registry.source().location(),
            units = catalog.len(),
            "Context ready"
        );
        Ok(Context { settings, registry, catalog, binder: self.binder })
    }
}
