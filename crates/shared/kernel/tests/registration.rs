use tilt_derive::{Bindable, Unit};
use tilt_domain::DecodedValue;
use tilt_kernel::{Catalog, NameFallback, Registrar, Unit as _, UnitDescriptor};
use tilt_logger::capture;
use tilt_store::{ConfigurationRegistry, MemorySource};

pub trait Program {}

#[derive(Debug, Default, Bindable, Unit)]
#[unit(register = "Blue Left", implements(Program))]
pub struct BlueLeft {
    #[configurable]
    pub delay_ms: i32,
    #[configurable]
    pub park: bool,
}

#[derive(Debug, Default, Bindable, Unit)]
#[unit(register, implements(Program))]
pub struct Unnamed {
    #[configurable]
    pub speed: f64,
}

#[derive(Debug, Default, Bindable, Unit)]
#[unit(register = "StopRobot", implements(Program))]
pub struct Halt;

#[derive(Debug, Default, Bindable, Unit)]
#[unit(register = "a=b", implements(Program))]
pub struct Broken;

#[derive(Debug, Default, Bindable, Unit)]
#[unit(register = "Blue.Right", implements(Program))]
pub struct BlueRight {
    #[configurable]
    pub delay_ms: i32,
}

#[derive(Debug, Default, Bindable, Unit)]
#[unit(register = "Base", abstract, implements(Program))]
pub struct BaseProgram {
    #[configurable]
    pub power: f64,
}

#[derive(Debug, Default, Bindable, Unit)]
#[unit(register = "Secret", hidden, implements(Program))]
pub struct Secret;

#[derive(Debug, Default, Bindable, Unit)]
#[unit(implements(Program))]
pub struct NotRegistered;

impl Program for BlueLeft {}
impl Program for Unnamed {}
impl Program for Halt {}
impl Program for Broken {}
impl Program for BlueRight {}
impl Program for BaseProgram {}
impl Program for Secret {}
impl Program for NotRegistered {}

fn catalog() -> Catalog {
    Catalog::builder()
        .register::<BlueLeft>()
        .register::<Unnamed>()
        .register::<Halt>()
        .register::<Broken>()
        .register::<BaseProgram>()
        .register::<Secret>()
        .register::<NotRegistered>()
        .build()
}

fn reserved() -> Vec<String> {
    vec!["StopRobot".to_owned()]
}

#[test]
fn derived_descriptors_carry_attributes() {
    let blue = BlueLeft::descriptor();
    assert_eq!(blue.registration(), Some("Blue Left"));
    assert!(blue.is_assignable_to::<dyn Program>());
    assert!(blue.is_instantiable());

    assert_eq!(Unnamed::descriptor().registration(), Some(""));
    assert!(!BaseProgram::descriptor().is_instantiable());
    assert!(!Secret::descriptor().is_public());
    assert!(NotRegistered::descriptor().registration().is_none());
}

#[test]
fn only_public_instantiable_registered_programs_are_selected() {
    let catalog = catalog();
    let mut names: Vec<_> = catalog
        .query()
        .public()
        .instantiable()
        .with_marker(tilt_domain::Capabilities::REGISTERED)
        .assignable_to::<dyn Program>()
        .iter()
        .map(UnitDescriptor::simple_name)
        .collect();
    names.sort_unstable();

    assert_eq!(names, ["BlueLeft", "Broken", "Halt", "Unnamed"]);
}

#[test]
fn names_fall_back_to_the_type_name() {
    let catalog = catalog();
    let reserved = reserved();
    let mut registry = ConfigurationRegistry::new(MemorySource::new());
    let mut sunk = Vec::new();
    let query = catalog.query().public().instantiable().assignable_to::<dyn Program>();

    let (units, events) = capture::record(|| {
        Registrar::new(&reserved).register_all(query, &mut registry, &mut |name: &str, _: &UnitDescriptor| {
            sunk.push(name.to_owned());
        })
    });

    sunk.sort_unstable();
    assert_eq!(sunk, ["Blue Left", "Broken", "Halt", "NotRegistered", "Unnamed"]);
    assert_eq!(units.len(), 5);

    let fallbacks: Vec<_> = events
        .iter()
        .filter(|event| event.target == "tilt::registrar" && event.level == tracing::Level::WARN)
        .filter_map(|event| event.field("name"))
        .collect();
    assert_eq!(fallbacks.len(), 4);
    for name in ["Unnamed", "Halt", "Broken", "NotRegistered"] {
        assert!(fallbacks.contains(&name), "missing fallback diagnostic for {name}");
    }
}

#[test]
fn fallback_reasons_match_the_rule_that_fired() {
    let reserved = reserved();
    let cases = [
        (Unnamed::descriptor(), NameFallback::Empty),
        (Halt::descriptor(), NameFallback::Reserved),
        (Broken::descriptor(), NameFallback::ContainsSeparator),
        (BlueRight::descriptor(), NameFallback::Unsaveable),
    ];

    for (descriptor, reason) in cases {
        let name = tilt_kernel::resolve_display_name(
            descriptor.registration().unwrap_or_default(),
            descriptor.simple_name(),
            &reserved,
        );
        assert_eq!(name.name, descriptor.simple_name());
        assert_eq!(name.fallback, Some(reason));
    }
}

#[test]
fn registered_units_are_configured_under_their_name() {
    let source = MemorySource::with_contents("[autonomous]\nBlue Left.delay_ms=i_1500\n\n");
    let mut registry = ConfigurationRegistry::new(source.clone());
    let reserved = reserved();

    let unit = Registrar::new(&reserved)
        .register(&BlueLeft::descriptor(), &mut registry, &mut |_: &str, _: &UnitDescriptor| {})
        .unwrap();

    assert_eq!(unit.name, "Blue Left");
    assert!(unit.report.saved);
    let blue = unit.instance.as_any().downcast_ref::<BlueLeft>().unwrap();
    assert_eq!(blue.delay_ms, 1500);
    assert!(!blue.park);

    let program = registry.get_program("Blue Left");
    assert_eq!(program.get("park"), DecodedValue::Boolean(false));
    assert!(source.contents().unwrap().contains("Blue Left.park=b_false"));
}

#[test]
fn dotted_names_are_configured_under_the_type_name() {
    let source = MemorySource::new();
    let mut registry = ConfigurationRegistry::new(source.clone());
    let reserved = reserved();

    let (unit, events) = capture::record(|| {
        Registrar::new(&reserved).register(&BlueRight::descriptor(), &mut registry, &mut |_: &str, _: &UnitDescriptor| {})
    });

    let unit = unit.unwrap();
    assert_eq!(unit.name, "BlueRight");
    assert_eq!(source.contents().as_deref(), Some("[autonomous]\nBlueRight.delay_ms=i_0\n\n"));
    assert!(events.iter().any(|e| e.field("requested") == Some("Blue.Right")));
}

#[test]
fn abstract_units_reach_the_sink_but_are_not_configured() {
    let mut registry = ConfigurationRegistry::new(MemorySource::new());
    let reserved = reserved();
    let mut calls = 0;

    let unit = Registrar::new(&reserved).register(
        &BaseProgram::descriptor(),
        &mut registry,
        &mut |name: &str, _: &UnitDescriptor| {
            assert_eq!(name, "Base");
            calls += 1;
        },
    );

    assert!(unit.is_none());
    assert_eq!(calls, 1);
    assert!(registry.get_program("Base").is_empty());
}
