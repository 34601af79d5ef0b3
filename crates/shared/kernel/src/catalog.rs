use crate::unit::{Unit, UnitDescriptor};
use std::any::TypeId;
use tilt_domain::Capabilities;
use tracing::{debug, info};

/// Collects unit descriptors at start-up.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    blacklist: Vec<String>,
    descriptors: Vec<UnitDescriptor>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Type-path prefixes that are never reported.
    #[must_use]
    pub fn blacklist<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist.extend(prefixes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn register<U: Unit>(self) -> Self {
        self.register_descriptor(U::descriptor())
    }

    #[must_use]
    pub fn register_descriptor(mut self, descriptor: UnitDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Drops blacklisted and duplicate descriptors.
    #[must_use]
    pub fn build(self) -> Catalog {
        let mut units: Vec<UnitDescriptor> = Vec::with_capacity(self.descriptors.len());

        for descriptor in self.descriptors {
            let path = descriptor.type_path();
            if let Some(prefix) = self.blacklist.iter().find(|prefix| path.starts_with(prefix.as_str())) {
                debug!(target: "tilt::catalog", unit = path, prefix = %prefix, "Unit blacklisted");
                continue;
            }
            if units.contains(&descriptor) {
                debug!(target: "tilt::catalog", unit = path, "Duplicate unit ignored");
                continue;
            }
            units.push(descriptor);
        }

        info!(target: "tilt::catalog", units = units.len(), "Unit catalog built");
        Catalog { units }
    }
}

/// The units known to this process.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: Vec<UnitDescriptor>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    #[must_use]
    pub fn units(&self) -> &[UnitDescriptor] {
        &self.units
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn get<U: Unit>(&self) -> Option<&UnitDescriptor> {
        self.units.iter().find(|unit| unit.type_id() == TypeId::of::<U>())
    }

    /// Starts a filter over every unit.
    #[must_use]
    pub const fn query(&self) -> UnitQuery<'_> {
        UnitQuery {
            catalog: self,
            public_only: false,
            instantiable_only: false,
            marker: Capabilities::empty(),
            base: None,
        }
    }
}

/// Chainable unit filter. Result order is not meaningful.
#[derive(Debug, Clone, Copy)]
pub struct UnitQuery<'a> {
    catalog: &'a Catalog,
    public_only: bool,
    instantiable_only: bool,
    marker: Capabilities,
    base: Option<TypeId>,
}

impl<'a> UnitQuery<'a> {
    #[must_use]
    pub const fn public(mut self) -> Self {
        self.public_only = true;
        self
    }

    #[must_use]
    pub const fn instantiable(mut self) -> Self {
        self.instantiable_only = true;
        self
    }

    /// Keeps units carrying every flag in `marker`.
    #[must_use]
    pub fn with_marker(mut self, marker: Capabilities) -> Self {
        self.marker |= marker;
        self
    }

    #[must_use]
    pub fn assignable_to<B: ?Sized + 'static>(mut self) -> Self {
        self.base = Some(TypeId::of::<B>());
        self
    }

    #[must_use]
    pub fn matches(&self, unit: &UnitDescriptor) -> bool {
        (!self.public_only || unit.is_public())
            && (!self.instantiable_only || unit.is_instantiable())
            && unit.capabilities().contains(self.marker)
            && self.base.is_none_or(|base| unit.is_assignable_to_id(base))
    }

    pub fn iter(self) -> impl Iterator<Item = &'a UnitDescriptor> {
        self.catalog.units.iter().filter(move |unit| self.matches(unit))
    }

    #[must_use]
    pub fn collect(self) -> Vec<&'a UnitDescriptor> {
        self.iter().collect()
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.iter().count()
    }
}
