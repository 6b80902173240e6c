//! Node attribute store
//!
//! Provides [`Attributes`], a name-ordered map of scalar [`Value`]s.
//!
//! # Truthiness
//! Absence and a falsy value are the same thing: setting an attribute to
//! `false`, `0`, `0.0` or `""` removes it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Boolean flag
    Boolean(bool),
    /// Signed integer
    Integer(i64),
    /// Unsigned integer
    Natural(u64),
    /// Floating point
    Real(f64),
    /// Text
    String(String),
}

impl Value {
    /// False for `false`, `0`, `0.0` and `""`
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(value) => *value,
            Self::Integer(value) => *value != 0,
            Self::Natural(value) => *value != 0,
            Self::Real(value) => *value != 0.0,
            Self::String(value) => !value.is_empty(),
        }
    }

    /// Borrow the text of a string value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Name of the variant, as used in snapshots
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Natural(_) => "natural",
            Self::Real(_) => "real",
            Self::String(_) => "string",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Natural(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Natural(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Natural(u64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Types an attribute can be read as
///
/// Reads are exact: an integer attribute is not visible as a natural.
pub trait FromValue: Sized + Default {
    /// Extract `Self` if the value holds this type
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Natural(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Real(value) => Some(*value),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// Name-ordered attribute map
///
/// # Invariants
/// - Names are unique
/// - No stored value is falsy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `name` as `T`, or `T::default()` when absent or of another type
    #[must_use]
    pub fn get<T: FromValue>(&self, name: &str) -> T {
        self.0
            .get(name)
            .and_then(T::from_value)
            .unwrap_or_default()
    }

    /// True if `name` exists and holds a `T`
    #[must_use]
    pub fn has<T: FromValue>(&self, name: &str) -> bool {
        self.0.get(name).and_then(T::from_value).is_some()
    }

    /// Raw value for `name`
    #[inline]
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Insert or overwrite `name`; a falsy value removes it instead
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if value.is_truthy() {
            self.0.insert(name, value);
        } else {
            self.0.remove(&name);
        }
    }

    /// Store the canonical string form of `value` under `name`
    pub fn set_string(&mut self, name: impl Into<String>, value: impl Display) {
        self.set(name, Value::String(value.to_string()));
    }

    /// Remove `name`, returning the old value
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Number of stored attributes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All attributes in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// String-typed attributes in name order (the persisted subset)
    pub fn strings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(name, value)| value.as_str().map(|text| (name.as_str(), text)))
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values_remove() {
        let mut attributes = Attributes::new();
        attributes.set("flag", true);
        attributes.set("count", 3_u64);
        attributes.set("label", "cart");
        assert_eq!(attributes.len(), 3);

        attributes.set("flag", false);
        attributes.set("count", 0_u64);
        attributes.set("label", "");
        assert!(attributes.is_empty());
    }

    #[test]
    fn setting_falsy_on_absent_is_noop() {
        let mut attributes = Attributes::new();
        attributes.set("missing", 0.0);
        assert!(!attributes.has::<f64>("missing"));
        assert!(attributes.is_empty());
    }

    #[test]
    fn reads_are_type_exact() {
        let mut attributes = Attributes::new();
        attributes.set("offset", -4_i64);

        assert_eq!(attributes.get::<i64>("offset"), -4);
        assert!(attributes.has::<i64>("offset"));
        assert!(!attributes.has::<u64>("offset"));
        assert_eq!(attributes.get::<u64>("offset"), 0);
        assert_eq!(attributes.get::<String>("offset"), "");
    }

    #[test]
    fn overwrite_changes_type() {
        let mut attributes = Attributes::new();
        attributes.set("mode", 1_u64);
        attributes.set("mode", "fast");
        assert!(attributes.has::<String>("mode"));
        assert!(!attributes.has::<u64>("mode"));
    }

    #[test]
    fn set_string_uses_canonical_form() {
        let mut attributes = Attributes::new();
        attributes.set_string("clock", 21_477_272_u64);
        attributes.set_string("enabled", true);
        attributes.set_string("scale", 1.5);
        assert_eq!(attributes.get::<String>("clock"), "21477272");
        assert_eq!(attributes.get::<String>("enabled"), "true");
        assert_eq!(attributes.get::<String>("scale"), "1.5");
    }

    #[test]
    fn strings_skip_other_types() {
        let attributes: Attributes = [
            ("b", Value::from("two")),
            ("a", Value::from("one")),
            ("n", Value::from(7_u64)),
        ]
        .into_iter()
        .collect();

        let strings: Vec<_> = attributes.strings().collect();
        assert_eq!(strings, vec![("a", "one"), ("b", "two")]);
    }

    #[test]
    fn value_display_and_truthiness() {
        assert_eq!(Value::from(-2_i32).to_string(), "-2");
        assert_eq!(Value::from(false).to_string(), "false");
        assert!(!Value::Real(0.0).is_truthy());
        assert!(Value::Real(-0.5).is_truthy());
        assert_eq!(Value::from(9_u32).type_name(), "natural");
    }
}
