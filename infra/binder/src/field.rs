use crate::device::DeviceSlot;
use std::fmt;
use tilt_domain::{Capabilities, ValueTag};

/// A type whose fields can be enumerated for binding.
///
/// Usually derived with `#[derive(tilt_derive::Bindable)]`.
pub trait Bindable {
    /// Every field of the value, including those of flattened base structs.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Capabilities implied by the field markers.
    fn capabilities() -> Capabilities
    where
        Self: Sized,
    {
        Capabilities::empty()
    }
}

/// Which marker a field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Configurable,
    Hardware,
}

/// A binding marker plus its optional lookup key override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Configurable { key: Option<&'static str> },
    Hardware { name: Option<&'static str> },
}

impl Marker {
    #[must_use]
    pub const fn kind(&self) -> MarkerKind {
        match self {
            Self::Configurable { .. } => MarkerKind::Configurable,
            Self::Hardware { .. } => MarkerKind::Hardware,
        }
    }

    /// The explicit key, ignoring blank overrides.
    #[must_use]
    pub fn key_override(&self) -> Option<&'static str> {
        let key = match self {
            Self::Configurable { key } => *key,
            Self::Hardware { name } => *name,
        };
        key.filter(|k| !k.trim().is_empty())
    }
}

/// Declared kind of a field as far as binding is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Value(ValueTag),
    Device,
    Unsupported,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(tag) => write!(f, "{tag}"),
            Self::Device => f.write_str("device"),
            Self::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Mutable access to a field's storage.
pub enum Slot<'a> {
    Boolean(&'a mut bool),
    Integer(&'a mut i32),
    Double(&'a mut f64),
    Text(&'a mut String),
    Device(&'a mut dyn DeviceSlot),
    Unsupported,
}

impl Slot<'_> {
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Boolean(_) => FieldKind::Value(ValueTag::Boolean),
            Self::Integer(_) => FieldKind::Value(ValueTag::Integer),
            Self::Double(_) => FieldKind::Value(ValueTag::Double),
            Self::Text(_) => FieldKind::Value(ValueTag::Text),
            Self::Device(_) => FieldKind::Device,
            Self::Unsupported => FieldKind::Unsupported,
        }
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            Self::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Self::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Self::Device(slot) => f.debug_tuple("Device").field(&slot.device_type()).finish(),
            Self::Unsupported => f.write_str("Unsupported"),
        }
    }
}

/// One field of a bindable value.
#[derive(Debug)]
pub struct Field<'a> {
    /// Name of the struct that declares the field.
    pub owner: &'static str,
    pub name: &'static str,
    /// The field's type as written in the source.
    pub declared_type: &'static str,
    pub public: bool,
    pub marker: Option<Marker>,
    pub slot: Slot<'a>,
}

impl Field<'_> {
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.slot.kind()
    }

    #[must_use]
    pub fn marker_kind(&self) -> Option<MarkerKind> {
        self.marker.as_ref().map(Marker::kind)
    }

    /// Lookup key: the marker's override, else the field name.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.marker.as_ref().and_then(Marker::key_override).unwrap_or(self.name)
    }

    /// Detached identity of this field.
    #[must_use]
    pub fn target(&self) -> BindingTarget {
        BindingTarget {
            owner: self.owner,
            field: self.name,
            declared_type: self.declared_type,
            kind: self.kind(),
            marker: self.marker_kind(),
            key: self.key(),
        }
    }
}

/// Identity of a field, detached from the value it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingTarget {
    pub owner: &'static str,
    pub field: &'static str,
    pub declared_type: &'static str,
    pub kind: FieldKind,
    pub marker: Option<MarkerKind>,
    pub key: &'static str,
}

impl fmt::Display for BindingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.field, self.declared_type)
    }
}
