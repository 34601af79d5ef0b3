use crate::models::args::Kind;
use anyhow::{Result, bail};
use std::path::Path;
use tilt::domain::{TaggedValue, ValueTag};
use tilt::store::{self, ConfigurationRegistry};
use tracing::info;

/// Stores `value` under `program.key` and saves the file.
///
/// # Errors
/// Returns an error if a name or the value cannot be written as one config
/// line, if the value does not parse as `kind`, or on I/O failure.
pub fn set(path: &Path, program: &str, key: &str, value: &str, kind: Option<Kind>) -> Result<()> {
    if !store::is_storable_program_name(program) {
        bail!("program name `{}` must not contain '.', '=' or line breaks", program.escape_debug());
    }
    if !store::is_storable_key(key) {
        bail!("key `{}` must be non-empty without '.', '=' or line breaks", key.escape_debug());
    }
    if !store::is_storable_payload(value) {
        bail!("value must fit on one line");
    }

    let tagged = match kind.map(ValueTag::from) {
        Some(ValueTag::Boolean) => TaggedValue::boolean(parse_flag(value)?),
        Some(tag) => {
            let tagged = TaggedValue::new(tag, value);
            if tag != ValueTag::Text && tagged.decode().is_empty() {
                bail!("`{value}` is not a valid {}", tag.kind_name());
            }
            tagged
        },
        None => TaggedValue::infer(value),
    };

    let mut registry = ConfigurationRegistry::open(path);
    registry.reload()?;
    registry.get_program(program).put_tagged(key, tagged.clone());
    registry.save()?;

    info!(target: "tilt::shell", program, key, value = %tagged, "Value stored");
    println!("{program}.{}={tagged}", key.to_lowercase());
    Ok(())
}

/// Accepts `true` or `false` in any case.
fn parse_flag(value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        bail!("`{value}` is not a valid {}", ValueTag::Boolean.kind_name())
    }
}

/// Removes the config file.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn delete(path: &Path) -> Result<()> {
    let mut registry = ConfigurationRegistry::open(path);
    registry.delete()?;
    println!("deleted {}", path.display());
    Ok(())
}
