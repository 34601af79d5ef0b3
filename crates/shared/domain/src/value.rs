//! Self-describing tagged values.
//!
//! Every persisted value is rendered as `<tag>_<payload>` where the tag is one
//! of `d` (double), `i` (integer), `b` (boolean) or `s` (string).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the tag character and the payload.
pub const TAG_SEPARATOR: char = '_';

/// The kind of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueTag {
    Double,
    Integer,
    Boolean,
    Text,
}

impl ValueTag {
    pub const ALL: [Self; 4] = [Self::Double, Self::Integer, Self::Boolean, Self::Text];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Double => 'd',
            Self::Integer => 'i',
            Self::Boolean => 'b',
            Self::Text => 's',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Double),
            'i' => Some(Self::Integer),
            'b' => Some(Self::Boolean),
            's' => Some(Self::Text),
            _ => None,
        }
    }

    /// Human-readable kind name used in diagnostics.
    #[must_use]
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Integer => "int",
            Self::Boolean => "boolean",
            Self::Text => "string",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// A tag plus its raw payload. Always renders as `<tag>_<payload>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaggedValue {
    tag: ValueTag,
    payload: String,
}

impl TaggedValue {
    pub fn new(tag: ValueTag, payload: impl Into<String>) -> Self {
        Self { tag, payload: payload.into() }
    }

    #[must_use]
    pub fn double(value: f64) -> Self {
        Self::new(ValueTag::Double, format!("{value:?}"))
    }

    #[must_use]
    pub fn integer(value: i32) -> Self {
        Self::new(ValueTag::Integer, value.to_string())
    }

    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::new(ValueTag::Boolean, value.to_string())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(ValueTag::Text, value)
    }

    /// Strict parse: succeeds only for `<valid tag>_<payload>`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        let tag = chars.next().and_then(ValueTag::from_char)?;
        if chars.next() != Some(TAG_SEPARATOR) {
            return None;
        }
        Some(Self::new(tag, chars.as_str()))
    }

    /// Raw-set path: keeps a correctly tagged string as-is, wraps anything else as text.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|| Self::text(raw))
    }

    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        self.tag
    }

    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Decodes the payload according to the tag.
    ///
    /// A payload that cannot be read as its tag's kind decodes to [`DecodedValue::Empty`].
    /// Booleans are lenient: only a case-insensitive `true` is true, anything else is false.
    #[must_use]
    pub fn decode(&self) -> DecodedValue {
        match self.tag {
            ValueTag::Double => {
                self.payload.trim().parse().map_or(DecodedValue::Empty, DecodedValue::Double)
            },
            ValueTag::Integer => {
                self.payload.trim().parse().map_or(DecodedValue::Empty, DecodedValue::Integer)
            },
            ValueTag::Boolean => DecodedValue::Boolean(self.payload.eq_ignore_ascii_case("true")),
            ValueTag::Text => DecodedValue::Text(self.payload.clone()),
        }
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{TAG_SEPARATOR}{}", self.tag.as_char(), self.payload)
    }
}

/// Result of decoding a stored value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DecodedValue {
    Double(f64),
    Integer(i32),
    Boolean(bool),
    Text(String),
    #[default]
    Empty,
}

impl DecodedValue {
    #[must_use]
    pub const fn tag(&self) -> Option<ValueTag> {
        match self {
            Self::Double(_) => Some(ValueTag::Double),
            Self::Integer(_) => Some(ValueTag::Integer),
            Self::Boolean(_) => Some(ValueTag::Boolean),
            Self::Text(_) => Some(ValueTag::Text),
            Self::Empty => None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Empty => f.write_str("<empty>"),
        }
    }
}

/// A primitive that can be stored in and read back from a program config.
pub trait ConfigValue: Sized {
    const TAG: ValueTag;

    /// Extracts `Self` if the decoded value has the matching kind.
    fn from_decoded(value: DecodedValue) -> Option<Self>;

    fn to_tagged(&self) -> TaggedValue;
}

impl ConfigValue for f64 {
    const TAG: ValueTag = ValueTag::Double;

    fn from_decoded(value: DecodedValue) -> Option<Self> {
        match value {
            DecodedValue::Double(v) => Some(v),
            _ => None,
        }
    }

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::double(*self)
    }
}

impl ConfigValue for i32 {
    const TAG: ValueTag = ValueTag::Integer;

    fn from_decoded(value: DecodedValue) -> Option<Self> {
        match value {
            DecodedValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::integer(*self)
    }
}

impl ConfigValue for bool {
    const TAG: ValueTag = ValueTag::Boolean;

    fn from_decoded(value: DecodedValue) -> Option<Self> {
        match value {
            DecodedValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::boolean(*self)
    }
}

impl ConfigValue for String {
    const TAG: ValueTag = ValueTag::Text;

    fn from_decoded(value: DecodedValue) -> Option<Self> {
        match value {
            DecodedValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Text that already carries a valid tag is stored verbatim.
    fn to_tagged(&self) -> TaggedValue {
        TaggedValue::infer(self)
    }
}
