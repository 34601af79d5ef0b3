use crate::error::{KernelError, KernelErrorExt};
use config::{Config, Environment, File};
use std::path::Path;
use tracing::info;

pub use tilt_domain::Settings;

const DEFAULT_SETTINGS_FILE: &str = "tilt";
const ENV_PREFIX: &str = "TILT";

/// Loads the tool settings.
///
/// Layers, lowest priority first:
/// 1. Built-in defaults ([`Settings::default`]).
/// 2. An optional settings file (`tilt.toml`, `tilt.json`, ... when no path is given).
///    A missing file is not an error.
/// 3. Environment variables prefixed with `TILT__`, e.g. `TILT__CONFIG_PATH=/sdcard/ftc.config`.
///    List values are comma separated: `TILT__RESERVED_NAMES=StopRobot,Idle`.
///
/// # Errors
///
/// Returns [`KernelError::Settings`] if a source is malformed or does not match [`Settings`].
///
/// # Example
/// ```rust
/// use tilt_kernel::settings::load_settings;
///
/// let settings = load_settings(Some("does/not/exist.toml")).unwrap();
/// assert_eq!(settings.config_path, std::path::PathBuf::from("ftc.config"));
/// ```
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<Settings, KernelError> {
    let file = match path {
        Some(path) => File::from(path.as_ref()).required(false),
        None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
    };

    let builder = Config::builder().add_source(file).add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("reserved_names")
            .with_list_parse_key("blacklist"),
    );

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")?;

    info!(
        target: "tilt::settings",
        config_path = %settings.config_path.display(),
        reserved = settings.reserved_names.len(),
        blacklist = settings.blacklist.len(),
        "Settings loaded"
    );
    Ok(settings)
}
