use tilt_derive::{Bindable, Unit};
use tilt_kernel::{Capabilities, Unit as _};

pub trait Program {}
pub trait Autonomous {}

#[derive(Default, Bindable, Unit)]
#[unit(register = "Blue Left", implements(Program, Autonomous))]
pub struct BlueLeft {
    #[configurable]
    pub delay_ms: i32,
}

impl Program for BlueLeft {}
impl Autonomous for BlueLeft {}

#[derive(Default, Bindable, Unit)]
#[unit(register)]
pub struct Unnamed;

#[derive(Bindable, Unit)]
#[unit(abstract, hidden)]
pub struct Base {
    #[configurable]
    pub power: f64,
}

fn main() {
    let blue = BlueLeft::descriptor();
    assert_eq!(blue.simple_name(), "BlueLeft");
    assert_eq!(blue.registration(), Some("Blue Left"));
    assert!(blue.is_assignable_to::<dyn Program>());
    assert!(blue.is_assignable_to::<dyn Autonomous>());
    assert!(blue.capabilities().contains(Capabilities::REGISTERED | Capabilities::CONFIGURABLE));

    assert_eq!(Unnamed::descriptor().registration(), Some(""));

    let base = Base::descriptor();
    assert!(!base.is_instantiable());
    assert!(!base.is_public());
    assert!(base.registration().is_none());
}
