use std::fmt;
use tilt_store::is_storable_program_name;

/// Forbidden inside display names: it would break the `program.key=value` lines.
pub const NAME_SEPARATOR: char = '=';

/// Why a requested registration name was replaced by the simple type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFallback {
    Empty,
    Reserved,
    ContainsSeparator,
    /// A `.` or line break, which the config file cannot hold in a program name.
    Unsaveable,
}

impl fmt::Display for NameFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "no name given",
            Self::Reserved => "name is reserved",
            Self::ContainsSeparator => "name contains '='",
            Self::Unsaveable => "name contains '.' or a line break",
        })
    }
}

/// The decided display name of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName {
    pub name: String,
    pub fallback: Option<NameFallback>,
}

/// Decides the name a unit registers under.
///
/// Rules are checked in order: an empty request, a reserved name, a name
/// containing `=`, then any other name the config file could not save. Each
/// falls back to `simple_name`; anything else is used as is.
#[must_use]
pub fn resolve_display_name(requested: &str, simple_name: &str, reserved: &[String]) -> DisplayName {
    let fallback = if requested.is_empty() {
        Some(NameFallback::Empty)
    } else if reserved.iter().any(|name| name == requested) {
        Some(NameFallback::Reserved)
    } else if requested.contains(NAME_SEPARATOR) {
        Some(NameFallback::ContainsSeparator)
    } else if !is_storable_program_name(requested) {
        Some(NameFallback::Unsaveable)
    } else {
        None
    };

    let name = if fallback.is_some() { simple_name } else { requested };
    DisplayName { name: name.to_owned(), fallback }
}
