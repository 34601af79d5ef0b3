use crate::device::DeviceRegistry;
use crate::field::{Bindable, BindingTarget, Field, FieldKind, MarkerKind, Slot};
use std::fmt;
use tilt_domain::ValueTag;
use tilt_store::{ConfigurationRegistry, ProgramConfig};
use tracing::{debug, error, info, warn};

/// Order in which config fields are bound.
const VALUE_ORDER: [ValueTag; 4] =
    [ValueTag::Boolean, ValueTag::Integer, ValueTag::Double, ValueTag::Text];

/// Why a marked field was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotPublic,
    UnsupportedType,
    DeviceMissing,
    DeviceTypeMismatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotPublic => "not public",
            Self::UnsupportedType => "unsupported type",
            Self::DeviceMissing => "no such device",
            Self::DeviceTypeMismatch => "device of another type",
        })
    }
}

/// Outcome of one binding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    pub bound: Vec<BindingTarget>,
    pub skipped: Vec<(BindingTarget, SkipReason)>,
    /// Whether the registry was saved after a config pass.
    pub saved: bool,
}

impl BindReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, field: &Field<'_>, reason: SkipReason) {
        warn!(
            target: "tilt::binder",
            owner = field.owner,
            field = field.name,
            declared_type = field.declared_type,
            %reason,
            "Skipping field"
        );
        self.skipped.push((field.target(), reason));
    }
}

/// Assigns config values and devices into marked fields.
///
/// A pass never aborts: problems with single fields are logged, recorded in
/// the [`BindReport`] and skipped.
#[derive(Debug, Clone, Copy)]
pub struct FieldBinder {
    autosave: bool,
}

impl Default for FieldBinder {
    fn default() -> Self {
        Self { autosave: true }
    }
}

impl FieldBinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`FieldBinder::bind_config`] saves the registry afterwards (on by default).
    #[must_use]
    pub const fn autosave(mut self, enabled: bool) -> Self {
        self.autosave = enabled;
        self
    }

    /// Binds every public `#[configurable]` field of `unit` from the config of
    /// `program`. Fields are processed kind by kind: booleans, integers,
    /// doubles, then strings. A stored value of the wrong kind (or none) is
    /// replaced by the field's current value, which acts as the default.
    ///
    /// The registry is refreshed first, so edits made to the source since the
    /// last load are picked up.
    pub fn bind_config(
        &self,
        registry: &mut ConfigurationRegistry,
        program: &str,
        unit: &mut dyn Bindable,
    ) -> BindReport {
        let mut report = BindReport::default();
        match registry.refresh() {
            Ok(true) => debug!(target: "tilt::binder", program, "Config reloaded from source"),
            Ok(false) => {},
            Err(err) => error!(target: "tilt::binder", program, %err, "Failed to load config"),
        }

        let mut fields = marked_fields(unit, MarkerKind::Configurable, &mut report);
        let config = registry.get_program(program);

        for tag in VALUE_ORDER {
            for field in fields.iter_mut().filter(|f| f.kind() == FieldKind::Value(tag)) {
                bind_value(config, field);
                report.bound.push(field.target());
            }
        }

        for field in fields.iter().filter(|f| !matches!(f.kind(), FieldKind::Value(_))) {
            report.skip(field, SkipReason::UnsupportedType);
        }

        if self.autosave {
            match registry.save() {
                Ok(()) => report.saved = true,
                Err(err) => error!(target: "tilt::binder", program, %err, "Failed to save config"),
            }
        }

        info!(
            target: "tilt::binder",
            program,
            bound = report.bound.len(),
            skipped = report.skipped.len(),
            "Config binding done"
        );
        report
    }

    /// Binds every public `#[hardware]` field of `unit` from `devices`.
    pub fn bind_devices(&self, devices: &dyn DeviceRegistry, unit: &mut dyn Bindable) -> BindReport {
        let mut report = BindReport::default();
        let mut fields = marked_fields(unit, MarkerKind::Hardware, &mut report);

        for field in &mut fields {
            let key = field.key();
            let Slot::Device(slot) = &mut field.slot else {
                report.skip(field, SkipReason::UnsupportedType);
                continue;
            };

            let Some(handle) = devices.lookup(key) else {
                report.skip(field, SkipReason::DeviceMissing);
                continue;
            };

            if slot.assign(&handle) {
                debug!(target: "tilt::binder", field = field.name, device = key, "Device bound");
                report.bound.push(field.target());
            } else {
                report.skip(field, SkipReason::DeviceTypeMismatch);
            }
        }

        info!(
            target: "tilt::binder",
            bound = report.bound.len(),
            skipped = report.skipped.len(),
            "Device binding done"
        );
        report
    }
}

/// Fields carrying `marker`; marked but non-public fields are reported and dropped.
fn marked_fields<'a>(
    unit: &'a mut dyn Bindable,
    marker: MarkerKind,
    report: &mut BindReport,
) -> Vec<Field<'a>> {
    let mut selected = Vec::new();
    for field in unit.fields() {
        if field.marker_kind() != Some(marker) {
            continue;
        }
        if field.public {
            selected.push(field);
        } else {
            report.skip(&field, SkipReason::NotPublic);
        }
    }
    selected
}

fn bind_value(config: &mut ProgramConfig, field: &mut Field<'_>) {
    let key = field.key();
    match &mut field.slot {
        Slot::Boolean(value) => **value = config.get_or(key, **value),
        Slot::Integer(value) => **value = config.get_or(key, **value),
        Slot::Double(value) => **value = config.get_or(key, **value),
        Slot::Text(value) => **value = config.get_or(key, (**value).clone()),
        Slot::Device(_) | Slot::Unsupported => return,
    }
    debug!(target: "tilt::binder", field = field.name, key, "Field bound");
}
