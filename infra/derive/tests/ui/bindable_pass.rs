use std::sync::Arc;
use tilt_binder::{Bindable as _, Capabilities, FieldKind, Marker};
use tilt_derive::Bindable;

pub struct Motor;

#[derive(Default, Bindable)]
pub struct Base {
    #[configurable(key = "Power")]
    pub power: f64,
}

#[derive(Default, Bindable)]
pub struct Auto {
    #[bindable(flatten)]
    pub base: Base,
    #[configurable]
    pub turns: i32,
    #[configurable]
    pub label: String,
    #[hardware(name = "left_drive")]
    pub left: Option<Arc<Motor>>,
    #[hardware]
    pub bogus: i32,
    #[bindable(skip)]
    pub cache: Vec<u8>,
    enabled: bool,
}

#[derive(Default, Bindable)]
pub struct Empty;

fn main() {
    let mut auto = Auto::default();
    let fields = auto.fields();

    let names: Vec<_> = fields.iter().map(|field| field.name).collect();
    assert_eq!(names, ["power", "turns", "label", "left", "bogus", "enabled"]);

    assert_eq!(fields[0].key(), "Power");
    assert_eq!(fields[0].owner, "Base");
    assert_eq!(fields[3].marker, Some(Marker::Hardware { name: Some("left_drive") }));
    assert_eq!(fields[3].kind(), FieldKind::Device);
    assert_eq!(fields[4].kind(), FieldKind::Unsupported);
    assert!(!fields[5].public);

    assert_eq!(Auto::capabilities(), Capabilities::CONFIGURABLE | Capabilities::HARDWARE);
    assert!(Empty.fields().is_empty());
    assert!(<Empty as tilt_binder::Bindable>::capabilities().is_empty());
}
