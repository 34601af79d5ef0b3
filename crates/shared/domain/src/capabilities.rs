use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;

bitflags! {
    /// What a unit offers to the binder and the registrar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Capabilities: u32 {
        /// Carries a registration marker.
        const REGISTERED = 1 << 0;
        /// Has at least one `#[configurable]` field.
        const CONFIGURABLE = 1 << 1;
        /// Has at least one `#[hardware]` field.
        const HARDWARE = 1 << 2;

        const ALL = Self::REGISTERED.bits() | Self::CONFIGURABLE.bits() | Self::HARDWARE.bits();
    }
}

impl From<&str> for Capabilities {
    fn from(s: &str) -> Self {
        match s {
            "registered" => Self::REGISTERED,
            "configurable" => Self::CONFIGURABLE,
            "hardware" => Self::HARDWARE,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl From<u32> for Capabilities {
    fn from(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Serialize for Capabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_retain(bits))
    }
}
