use super::load_existing;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tilt::store::ProgramConfig;
use tracing::debug;

/// Prints the document as it would be saved.
///
/// # Errors
/// Returns an error if the file is missing or unreadable.
pub fn show(path: &Path) -> Result<()> {
    let mut registry = load_existing(path)?;
    print!("{}", registry.document());
    Ok(())
}

/// Lists parse diagnostics.
///
/// # Errors
/// Returns an error if the file is missing, unreadable, or has any diagnostic.
pub fn check(path: &Path) -> Result<()> {
    let mut registry = load_existing(path)?;

    for diagnostic in registry.diagnostics() {
        println!("{diagnostic}");
    }
    let problems = registry.diagnostics().len();
    if problems > 0 {
        bail!("{problems} problem(s) in {}", path.display());
    }

    let document = registry.document();
    let properties: usize = document.programs().map(ProgramConfig::len).sum();
    println!("ok: {} programs, {properties} properties", document.len());
    Ok(())
}

/// Prints the tagged value of `program.key`.
///
/// # Errors
/// Returns an error if the file, the program or the key is missing.
pub fn get(path: &Path, program: &str, key: &str) -> Result<()> {
    let mut registry = load_existing(path)?;
    let document = registry.document();

    let config = document.program(program).with_context(|| format!("No program `{program}`"))?;
    let value = config.raw(key).with_context(|| format!("No key `{key}` in `{program}`"))?;

    debug!(target: "tilt::shell", program, key, decoded = %value.decode(), "Value read");
    println!("{value}");
    Ok(())
}
