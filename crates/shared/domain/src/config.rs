use serde::Deserialize;
use std::path::PathBuf;

/// Settings of the tool itself (not the persisted program configuration).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Location of the persisted config document.
    pub config_path: PathBuf,
    /// Display names that collide with host-reserved entries.
    pub reserved_names: Vec<String>,
    /// Type-path prefixes the unit catalog never reports.
    pub blacklist: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("ftc.config"),
            reserved_names: vec!["StopRobot".to_owned()],
            blacklist: vec!["tilt::".to_owned(), "tilt_".to_owned()],
        }
    }
}

impl Settings {
    #[must_use]
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.iter().any(|reserved| reserved == name)
    }
}
