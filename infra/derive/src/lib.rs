#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the tilt workspace.
//!
//! * [`tilt_error`] turns an enum into a context-aware `thiserror` error.
//! * [`Bindable`] exposes a struct's fields to the field binder.
//! * [`Unit`] declares a struct as a pluggable unit for the catalog.
//!
//! The generated code refers to `::tilt_binder` (for `Bindable`) and `::tilt_kernel`
//! (for `Unit`), so consuming crates must depend on those crates by their own names.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a source field.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` if an `Internal`
///   variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants.
/// 2. Variants with a source must include `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[tilt_derive::tilt_error]
/// pub enum StoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn tilt_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Derives `tilt_binder::Bindable` for a struct with named fields or a unit struct.
///
/// Field attributes:
///
/// * `#[configurable]` / `#[configurable(key = "...")]` marks a field for config binding.
///   Supported kinds are `bool`, `i32`, `f64` and `String`; any other type is reported
///   as unsupported by the binder at runtime.
/// * `#[hardware]` / `#[hardware(name = "...")]` marks an `Option<Arc<T>>` device slot.
/// * `#[bindable(flatten)]` pulls in the fields of an embedded `Bindable` base struct.
/// * `#[bindable(skip)]` hides a field from the binder entirely.
///
/// ```rust,ignore
/// #[derive(Default, tilt_derive::Bindable)]
/// pub struct Drive {
///     #[configurable]
///     pub speed: f64,
///     #[configurable(key = "turns")]
///     pub turn_count: i32,
///     #[hardware(name = "left_servo")]
///     pub left: Option<Arc<ClawServo>>,
/// }
/// ```
#[proc_macro_derive(Bindable, attributes(configurable, hardware, bindable))]
pub fn derive_bindable(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::bindable::expand_derive(input).into()
}

/// Derives `tilt_kernel::Unit`, producing the unit's catalog descriptor.
///
/// Struct attribute `#[unit(...)]` accepts:
///
/// * `register` or `register = "Display Name"`: the registration marker.
/// * `implements(TraitA, TraitB)`: base capabilities the unit is assignable to.
///   A compile-time assertion checks that the struct really implements them.
/// * `abstract`: the unit cannot be instantiated (no factory, no `Default` bound).
/// * `hidden`: the unit is not public and is filtered out by `public()`.
///
/// ```rust,ignore
/// #[derive(Default, tilt_derive::Bindable, tilt_derive::Unit)]
/// #[unit(register = "Blue Side", implements(OpMode))]
/// pub struct BlueSide {
///     #[configurable]
///     pub delay: f64,
/// }
/// ```
#[proc_macro_derive(Unit, attributes(unit))]
pub fn derive_unit(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::unit::expand_derive(input).into()
}
