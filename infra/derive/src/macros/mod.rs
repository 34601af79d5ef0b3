pub mod bindable;
pub mod error;
pub mod unit;
