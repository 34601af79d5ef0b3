use tilt_binder::{Bindable, Capabilities, FieldBinder, SkipReason};
use tilt_domain::DecodedValue;
use tilt_derive::Bindable;
use tilt_logger::capture;
use tilt_store::{ConfigSource, ConfigurationRegistry, MemorySource, StoreError};

#[derive(Debug, Default, Bindable)]
pub struct Base {
    #[configurable]
    pub shared: i32,
    #[configurable]
    hidden: bool,
}

#[derive(Debug, Default, Bindable)]
pub struct Auto {
    #[bindable(flatten)]
    pub base: Base,
    #[configurable(key = "Turns")]
    pub turn_count: i32,
    #[configurable]
    pub label: String,
    #[configurable]
    pub speed: f64,
    #[configurable]
    pub park: bool,
    #[configurable]
    pub ratio: f32,
    pub untouched: i32,
    #[bindable(skip)]
    pub scratch: Vec<u8>,
}

fn registry(text: &str) -> (ConfigurationRegistry, MemorySource) {
    let source = MemorySource::with_contents(text);
    (ConfigurationRegistry::new(source.clone()), source)
}

#[test]
fn stored_values_are_assigned() {
    let (mut registry, _) = registry(
        "[autonomous]\nAuto.park=b_true\nAuto.turns=i_4\nAuto.speed=d_0.75\nAuto.label=s_left\nAuto.shared=i_9\n\n",
    );
    let mut auto = Auto::default();

    let report = FieldBinder::new().bind_config(&mut registry, "Auto", &mut auto);

    assert!(auto.park);
    assert_eq!(auto.turn_count, 4);
    assert!((auto.speed - 0.75).abs() < f64::EPSILON);
    assert_eq!(auto.label, "left");
    assert_eq!(auto.base.shared, 9);
    assert_eq!(auto.untouched, 0);
    assert!(report.saved);
}

#[test]
fn fields_are_bound_kind_by_kind() {
    let (mut registry, _) = registry("");
    let mut auto = Auto::default();

    let report = FieldBinder::new().bind_config(&mut registry, "Auto", &mut auto);
    let order: Vec<_> = report.bound.iter().map(|t| t.field).collect();

    assert_eq!(order, vec!["park", "shared", "turn_count", "speed", "label"]);
}

#[test]
fn missing_values_are_written_back_as_defaults() {
    let (mut registry, source) = registry("");
    let mut auto = Auto { turn_count: 3, speed: 2.5, label: "red".to_owned(), ..Auto::default() };

    FieldBinder::new().bind_config(&mut registry, "Auto", &mut auto);

    assert_eq!(
        source.contents().as_deref(),
        Some(
            "[autonomous]\nAuto.label=s_red\nAuto.park=b_false\nAuto.shared=i_0\nAuto.speed=d_2.5\nAuto.turns=i_3\n\n"
        )
    );
}

#[test]
fn mismatched_kind_is_healed_with_the_field_default() {
    let (mut registry, _) = registry("[autonomous]\nAuto.speed=i_5\n\n");
    let mut auto = Auto { speed: 2.5, ..Auto::default() };

    FieldBinder::new().bind_config(&mut registry, "Auto", &mut auto);

    assert!((auto.speed - 2.5).abs() < f64::EPSILON);
    assert_eq!(registry.get_program("Auto").get("speed"), DecodedValue::Double(2.5));
}

#[test]
fn unsupported_and_private_fields_are_skipped_with_diagnostics() {
    let (mut registry, _) = registry("");
    let mut auto = Auto::default();

    let (report, events) =
        capture::record(|| FieldBinder::new().bind_config(&mut registry, "Auto", &mut auto));

    let skipped: Vec<_> = report.skipped.iter().map(|(t, reason)| (t.field, *reason)).collect();
    assert!(skipped.contains(&("hidden", SkipReason::NotPublic)));
    assert!(skipped.contains(&("ratio", SkipReason::UnsupportedType)));
    assert!(!registry.get_program("Auto").contains("ratio"));
    assert!(
        events
            .iter()
            .any(|e| e.target == "tilt::binder" && e.field("field") == Some("ratio"))
    );
}

#[test]
fn binding_twice_is_idempotent() {
    let (mut registry, source) = registry("[autonomous]\nAuto.turns=i_8\n\n");
    let binder = FieldBinder::new();

    let mut first = Auto::default();
    binder.bind_config(&mut registry, "Auto", &mut first);
    let after_first = source.contents();

    let mut second = Auto::default();
    binder.bind_config(&mut registry, "Auto", &mut second);

    assert_eq!(first.turn_count, second.turn_count);
    assert_eq!(first.label, second.label);
    assert_eq!(after_first, source.contents());
}

#[test]
fn external_edits_are_picked_up_between_binds() {
    let (mut registry, source) = registry("[autonomous]\nAuto.speed=d_0.5\n\n");
    let binder = FieldBinder::new();

    let mut first = Auto::default();
    binder.bind_config(&mut registry, "Auto", &mut first);
    assert!((first.speed - 0.5).abs() < f64::EPSILON);

    source.replace("[autonomous]\nAuto.speed=d_0.9\nOther.x=i_1\n\n");
    let mut second = Auto::default();
    binder.bind_config(&mut registry, "Auto", &mut second);

    assert!((second.speed - 0.9).abs() < f64::EPSILON);
    assert!(source.contents().unwrap_or_default().contains("Other.x=i_1\n"));
}

/// Holds a document that cannot be read back.
#[derive(Debug, Clone)]
struct UnreadableSource {
    inner: MemorySource,
}

impl ConfigSource for UnreadableSource {
    fn read_all(&self) -> Result<String, StoreError> {
        Err(std::io::Error::other("bad sector").into())
    }

    fn write_all(&self, text: &str) -> Result<(), StoreError> {
        self.inner.write_all(text)
    }

    fn size(&self) -> Result<u64, StoreError> {
        self.inner.size()
    }

    fn exists_or_create(&self) -> Result<bool, StoreError> {
        self.inner.exists_or_create()
    }

    fn remove(&self) -> Result<(), StoreError> {
        self.inner.remove()
    }

    fn location(&self) -> String {
        "unreadable".to_owned()
    }
}

#[test]
fn unreadable_config_is_not_overwritten() {
    let source = UnreadableSource { inner: MemorySource::with_contents("[autonomous]\nOther.x=i_1\n\n") };
    let mut registry = ConfigurationRegistry::new(source.clone());
    let mut auto = Auto { speed: 2.5, ..Auto::default() };

    let (report, events) =
        capture::record(|| FieldBinder::new().bind_config(&mut registry, "Auto", &mut auto));

    assert!(!report.saved);
    assert!((auto.speed - 2.5).abs() < f64::EPSILON);
    assert_eq!(source.inner.contents().as_deref(), Some("[autonomous]\nOther.x=i_1\n\n"));
    assert!(events.iter().any(|e| e.target == "tilt::binder" && e.message.contains("Failed to load")));
}

#[test]
fn autosave_can_be_disabled() {
    let source = MemorySource::new();
    let mut registry = ConfigurationRegistry::new(source.clone());
    let mut auto = Auto::default();

    let report = FieldBinder::new().autosave(false).bind_config(&mut registry, "Auto", &mut auto);

    assert!(!report.saved);
    assert_eq!(source.contents().as_deref(), Some(""));
    assert!(registry.get_program("Auto").contains("turns"));
}

#[test]
fn derived_capabilities_follow_markers() {
    assert_eq!(Auto::capabilities(), Capabilities::CONFIGURABLE);
    assert_eq!(Base::capabilities(), Capabilities::CONFIGURABLE);
}
