use std::sync::Arc;
use tilt_binder::{
    Bindable, Capabilities, DeviceMap, FieldBinder, FieldFilter, FieldKind, MarkerKind,
    SkipReason, discover,
};
use tilt_derive::Bindable;

#[derive(Debug, PartialEq, Eq)]
pub struct Servo(&'static str);

#[derive(Debug)]
pub struct Motor;

#[derive(Debug, Default, Bindable)]
pub struct Robot {
    #[hardware]
    pub claw: Option<Arc<Servo>>,
    #[hardware(name = "left_drive")]
    pub left: Option<Arc<Motor>>,
    #[hardware(name = "  ")]
    pub arm: Option<Arc<Servo>>,
    #[hardware]
    pub wrong: Option<Arc<Motor>>,
    #[hardware]
    pub missing: Option<Arc<Servo>>,
    #[hardware]
    pub bogus: i32,
    #[configurable]
    pub delay: f64,
}

fn devices() -> DeviceMap {
    let mut map = DeviceMap::new();
    map.insert("claw", Servo("claw"));
    map.insert("left_drive", Motor);
    map.insert("arm", Servo("arm"));
    map.insert("wrong", Servo("not a motor"));
    map
}

#[test]
fn devices_are_resolved_by_key() {
    let devices = devices();
    let mut robot = Robot::default();

    let report = FieldBinder::new().bind_devices(&devices, &mut robot);

    assert_eq!(robot.claw.as_deref(), Some(&Servo("claw")));
    assert!(robot.left.is_some());
    assert_eq!(robot.arm.as_deref(), Some(&Servo("arm")));

    let bound: Vec<_> = report.bound.iter().map(|t| t.field).collect();
    assert_eq!(bound, vec!["claw", "left", "arm"]);
}

#[test]
fn absent_or_mistyped_devices_are_skipped() {
    let devices = devices();
    let mut robot = Robot::default();

    let report = FieldBinder::new().bind_devices(&devices, &mut robot);

    assert!(robot.wrong.is_none());
    assert!(robot.missing.is_none());
    let skipped: Vec<_> = report.skipped.iter().map(|(t, reason)| (t.field, *reason)).collect();
    assert_eq!(
        skipped,
        vec![
            ("wrong", SkipReason::DeviceTypeMismatch),
            ("missing", SkipReason::DeviceMissing),
            ("bogus", SkipReason::UnsupportedType),
        ]
    );
}

#[test]
fn discovery_lists_marked_public_fields() {
    let mut robot = Robot::default();

    let hardware = discover(&mut robot, MarkerKind::Hardware);
    assert_eq!(hardware.len(), 6);
    assert_eq!(hardware[1].key, "left_drive");
    assert_eq!(hardware[2].key, "arm");

    let config = discover(&mut robot, MarkerKind::Configurable);
    assert_eq!(config.len(), 1);
    assert_eq!(config[0].kind, FieldKind::Value(tilt_domain::ValueTag::Double));
    assert_eq!(config[0].declared_type, "f64");
}

#[test]
fn filters_chain() {
    let mut robot = Robot::default();

    let servos = FieldFilter::new()
        .public()
        .with_marker(MarkerKind::Hardware)
        .assignable_to::<Servo>()
        .discover(&mut robot);
    let names: Vec<_> = servos.iter().map(|t| t.field).collect();
    assert_eq!(names, vec!["claw", "arm", "missing"]);

    let devices = FieldFilter::new().of_kind(FieldKind::Device).discover(&mut robot);
    assert_eq!(devices.len(), 5);
    assert_eq!(devices[0].declared_type, "Option<Arc<Servo>>");
}

#[test]
fn derived_capabilities_combine_markers() {
    assert_eq!(Robot::capabilities(), Capabilities::HARDWARE | Capabilities::CONFIGURABLE);
}
