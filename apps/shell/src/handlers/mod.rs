pub mod edit;
pub mod inspect;

use anyhow::{Result, bail};
use std::path::Path;
use tilt::store::ConfigurationRegistry;

/// Opens an existing config file and parses it.
fn load_existing(path: &Path) -> Result<ConfigurationRegistry> {
    if !path.is_file() {
        bail!("{} does not exist", path.display());
    }
    let mut registry = ConfigurationRegistry::open(path);
    registry.reload()?;
    Ok(registry)
}
