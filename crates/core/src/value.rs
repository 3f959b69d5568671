//! The opaque value slot carried by every field, and the store holding them.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use parking_lot::RwLock;

/// Value held by a field.
///
/// The engine attaches no meaning to values beyond what the built-in rules
/// need: emptiness, a text rendering and a boolean reading.
///
/// Equality is exact except that every `NaN` equals every other `NaN`, so
/// a value always equals itself (and a confirmation of it).
#[derive(Debug, Clone, Default)]
pub enum FieldValue {
    /// No value (never set, or explicitly cleared).
    #[default]
    Empty,
    /// Text input.
    Text(String),
    /// Numeric input.
    Number(f64),
    /// Checkbox / toggle input.
    Bool(bool),
}

impl FieldValue {
    /// `Empty`, or text that is blank after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Text rendering of the value; `None` only for `Empty`.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Empty => None,
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Bool(b) => Some(Cow::Owned(b.to_string())),
        }
    }

    /// The boolean payload, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric payload, if this is a `Number`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

// ============================================================================
// VALUE STORE
// ============================================================================

/// Current values of every field of one form, keyed by name.
///
/// Shared with validation runs so cross-field rules can read a sibling's
/// value without holding the form or the sibling field.
#[derive(Debug, Default)]
pub(crate) struct ValueStore {
    slots: IndexMap<String, RwLock<FieldValue>>,
}

impl ValueStore {
    pub(crate) fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        Self {
            slots: values
                .into_iter()
                .map(|(name, value)| (name, RwLock::new(value)))
                .collect(),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<FieldValue> {
        self.slots.get(name).map(|slot| slot.read().clone())
    }

    /// Replaces a value. Returns `false` if the slot does not exist.
    pub(crate) fn set(&self, name: &str, value: FieldValue) -> bool {
        match self.slots.get(name) {
            Some(slot) => {
                *slot.write() = value;
                true
            }
            None => false,
        }
    }
}
