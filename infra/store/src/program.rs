use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tilt_domain::{ConfigValue, DecodedValue, TaggedValue};
use tracing::{debug, warn};

/// Typed key/value store of a single program.
///
/// Keys are lowercased on every insert and lookup. Typed reads never fail: a
/// missing, malformed or differently typed value is replaced by the caller's
/// default, which is then stored so the next save persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConfig {
    name: String,
    properties: BTreeMap<String, TaggedValue>,
}

impl ProgramConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), properties: BTreeMap::new() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decodes the value stored under `key`, or [`DecodedValue::Empty`].
    #[must_use]
    pub fn get(&self, key: &str) -> DecodedValue {
        let key = normalize(key);
        let Some(value) = self.properties.get(&key) else {
            debug!(target: "tilt::program", program = %self.name, key, "No value stored");
            return DecodedValue::Empty;
        };

        let decoded = value.decode();
        if decoded.is_empty() {
            warn!(target: "tilt::program", program = %self.name, key, raw = %value, "Malformed value");
        }
        decoded
    }

    /// Reads `key` as `T`, healing the stored value with `default` on any mismatch.
    pub fn get_or<T>(&mut self, key: &str, default: T) -> T
    where
        T: ConfigValue + fmt::Debug,
    {
        let actual = self.get(key);
        let found = actual.tag();

        if let Some(value) = T::from_decoded(actual) {
            return value;
        }

        match found {
            None => warn!(
                target: "tilt::program",
                program = %self.name,
                key,
                ?default,
                "Had no value, setting default"
            ),
            Some(tag) => warn!(
                target: "tilt::program",
                program = %self.name,
                key,
                expected = %T::TAG,
                actual = %tag,
                ?default,
                "Type mismatch, setting default"
            ),
        }

        self.put(key, &default);
        default
    }

    /// Stores a typed value. Returns whether it was stored.
    pub fn put<T: ConfigValue>(&mut self, key: &str, value: &T) -> bool {
        self.put_tagged(key, value.to_tagged())
    }

    /// Stores raw text, keeping a valid `<tag>_` prefix and wrapping anything else as a string.
    pub fn put_raw(&mut self, key: &str, raw: &str) -> bool {
        self.put_tagged(key, TaggedValue::infer(raw))
    }

    /// Stores an already tagged value.
    ///
    /// Keys and payloads that could not be written back as a single line are
    /// skipped with a warning; returns whether the value was stored.
    pub fn put_tagged(&mut self, key: &str, value: TaggedValue) -> bool {
        if !is_storable_key(key) {
            warn!(target: "tilt::program", program = %self.name, key, "Key cannot be stored, skipping");
            return false;
        }
        if !is_storable_payload(value.payload()) {
            warn!(
                target: "tilt::program",
                program = %self.name,
                key,
                payload = ?value.payload(),
                "Value spans lines, skipping"
            );
            return false;
        }

        self.properties.insert(normalize(key), value);
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<TaggedValue> {
        self.properties.remove(&normalize(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(&normalize(key))
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&TaggedValue> {
        self.properties.get(&normalize(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaggedValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A detached copy of the rendered properties.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.properties.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

const LINE_BREAKS: [char; 2] = ['\n', '\r'];
const NAME_RESERVED: [char; 4] = ['.', '=', '\n', '\r'];

/// Whether `name` survives a save as the program part of a `<program>.<key>=` line.
#[must_use]
pub fn is_storable_program_name(name: &str) -> bool {
    !name.contains(NAME_RESERVED)
}

/// Whether `key` survives a save as the key part of a `<program>.<key>=` line.
#[must_use]
pub fn is_storable_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(NAME_RESERVED)
}

/// Whether a value payload fits on one line.
#[must_use]
pub fn is_storable_payload(payload: &str) -> bool {
    !payload.contains(LINE_BREAKS)
}

impl PartialOrd for ProgramConfig {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProgramConfig {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then_with(|| self.properties.cmp(&other.properties))
    }
}

/// One `<program>.<key>=<value>` line per property.
impl fmt::Display for ProgramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.properties {
            writeln!(f, "{}.{key}={value}", self.name)?;
        }
        Ok(())
    }
}
