use crate::field::{Bindable, BindingTarget, Field, FieldKind, MarkerKind, Slot};
use std::any::{Any, TypeId};

/// Chainable field selection. An empty filter accepts every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    public_only: bool,
    marker: Option<MarkerKind>,
    kind: Option<FieldKind>,
    device_type: Option<TypeId>,
}

impl FieldFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn public(mut self) -> Self {
        self.public_only = true;
        self
    }

    #[must_use]
    pub const fn with_marker(mut self, marker: MarkerKind) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Keeps only fields whose declared kind is exactly `kind`.
    #[must_use]
    pub const fn of_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Keeps only device fields that can hold a `T`.
    #[must_use]
    pub fn assignable_to<T: Any>(mut self) -> Self {
        self.device_type = Some(TypeId::of::<T>());
        self
    }

    #[must_use]
    pub fn matches(&self, field: &Field<'_>) -> bool {
        if self.public_only && !field.public {
            return false;
        }
        if self.marker.is_some() && field.marker_kind() != self.marker {
            return false;
        }
        if self.kind.is_some_and(|kind| field.kind() != kind) {
            return false;
        }
        match (self.device_type, &field.slot) {
            (None, _) => true,
            (Some(wanted), Slot::Device(slot)) => slot.device_type_id() == wanted,
            (Some(_), _) => false,
        }
    }

    /// Filters already enumerated fields, keeping their slots.
    #[must_use]
    pub fn apply<'a>(&self, fields: Vec<Field<'a>>) -> Vec<Field<'a>> {
        fields.into_iter().filter(|field| self.matches(field)).collect()
    }

    /// Identities of the matching fields of `scope`.
    pub fn discover(&self, scope: &mut dyn Bindable) -> Vec<BindingTarget> {
        scope.fields().iter().filter(|field| self.matches(field)).map(Field::target).collect()
    }
}

/// Public fields of `scope` carrying `marker`.
pub fn discover(scope: &mut dyn Bindable, marker: MarkerKind) -> Vec<BindingTarget> {
    FieldFilter::new().public().with_marker(marker).discover(scope)
}
