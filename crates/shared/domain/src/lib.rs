//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, no logging, no heavy logic. Just data and simple helpers.

pub mod capabilities;
pub mod config;
pub mod value;

pub use capabilities::Capabilities;
pub use config::Settings;
pub use value::{ConfigValue, DecodedValue, TaggedValue, ValueTag};
