use std::any::{Any, TypeId, type_name};
use std::fmt;
use tilt_binder::Bindable;
use tilt_domain::Capabilities;

/// A pluggable unit that can be discovered through the [`Catalog`](crate::Catalog).
///
/// Usually derived with `#[derive(tilt_derive::Unit)]`:
///
/// ```rust
/// use tilt_kernel::Unit;
///
/// #[derive(Default, tilt_derive::Bindable, tilt_derive::Unit)]
/// #[unit(register = "Blue Left")]
/// pub struct BlueLeft {
///     #[configurable]
///     pub delay_ms: i32,
/// }
///
/// let descriptor = BlueLeft::descriptor();
/// assert_eq!(descriptor.simple_name(), "BlueLeft");
/// assert_eq!(descriptor.registration(), Some("Blue Left"));
/// ```
pub trait Unit: 'static {
    fn descriptor() -> UnitDescriptor
    where
        Self: Sized;
}

/// A live unit instance: bindable and downcastable.
pub trait UnitInstance: Bindable + Any + Send {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_bindable(&mut self) -> &mut dyn Bindable;
}

impl<T: Bindable + Any + Send> UnitInstance for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_bindable(&mut self) -> &mut dyn Bindable {
        self
    }
}

type Factory = fn() -> Box<dyn UnitInstance>;

fn construct<T: UnitInstance + Default>() -> Box<dyn UnitInstance> {
    Box::new(T::default())
}

#[derive(Debug, Clone, Copy)]
struct Base {
    id: TypeId,
    name: &'static str,
}

/// Static description of a unit type.
#[derive(Clone)]
pub struct UnitDescriptor {
    type_id: TypeId,
    type_path: &'static str,
    registration: Option<String>,
    capabilities: Capabilities,
    public: bool,
    factory: Option<Factory>,
    bases: Vec<Base>,
}

impl UnitDescriptor {
    /// Descriptor of a concrete unit built through `Default`.
    #[must_use]
    pub fn of<T: UnitInstance + Default>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            registration: None,
            capabilities: T::capabilities(),
            public: true,
            factory: Some(construct::<T>),
            bases: Vec::new(),
        }
    }

    /// Descriptor of a unit that cannot be instantiated on its own.
    #[must_use]
    pub fn abstract_of<T: Bindable + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            registration: None,
            capabilities: T::capabilities(),
            public: true,
            factory: None,
            bases: Vec::new(),
        }
    }

    /// Marks the unit for registration under `name`.
    ///
    /// The name is only a request; see [`resolve_display_name`](crate::resolve_display_name).
    #[must_use]
    pub fn register_as(mut self, name: impl Into<String>) -> Self {
        self.registration = Some(name.into());
        self.capabilities |= Capabilities::REGISTERED;
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.public = false;
        self
    }

    /// Declares that the unit can be used as a `B` (usually `dyn SomeTrait`).
    #[must_use]
    pub fn implements<B: ?Sized + 'static>(mut self) -> Self {
        let id = TypeId::of::<B>();
        if !self.bases.iter().any(|base| base.id == id) {
            self.bases.push(Base { id, name: type_name::<B>() });
        }
        self
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Last segment of the type path.
    #[must_use]
    pub fn simple_name(&self) -> &'static str {
        self.type_path.rsplit("::").next().unwrap_or(self.type_path)
    }

    /// The requested registration name, if the unit is registered at all.
    #[must_use]
    pub fn registration(&self) -> Option<&str> {
        self.registration.as_deref()
    }

    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }

    #[must_use]
    pub const fn is_instantiable(&self) -> bool {
        self.factory.is_some()
    }

    #[must_use]
    pub fn is_assignable_to<B: ?Sized + 'static>(&self) -> bool {
        self.is_assignable_to_id(TypeId::of::<B>())
    }

    pub(crate) fn is_assignable_to_id(&self, id: TypeId) -> bool {
        self.type_id == id || self.bases.iter().any(|base| base.id == id)
    }

    pub fn bases(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bases.iter().map(|base| base.name)
    }

    /// A fresh instance, or `None` for abstract units.
    #[must_use]
    pub fn instantiate(&self) -> Option<Box<dyn UnitInstance>> {
        self.factory.map(|factory| factory())
    }
}

impl fmt::Debug for UnitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitDescriptor")
            .field("type_path", &self.type_path)
            .field("registration", &self.registration)
            .field("capabilities", &self.capabilities)
            .field("public", &self.public)
            .field("instantiable", &self.is_instantiable())
            .field("bases", &self.bases().collect::<Vec<_>>())
            .finish()
    }
}

impl PartialEq for UnitDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for UnitDescriptor {}
