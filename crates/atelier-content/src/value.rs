//! Scalar frontmatter values and the flat records built from them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single coerced frontmatter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    /// Literal `true` / `false`.
    Bool(bool),
    /// A number that round-trips as a signed integer.
    Integer(i64),
    /// A number that round-trips only as a float.
    Float(f64),
    /// Anything else, with one pair of surrounding quotes removed.
    String(String),
}

impl FrontmatterValue {
    /// Borrow the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an integer.
    ///
    /// Floats without a fractional part are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
            _ => None,
        }
    }

    /// The value as a float, for any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for FrontmatterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FrontmatterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FrontmatterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FrontmatterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FrontmatterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FrontmatterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Flat key/value mapping parsed from one markdown resource.
///
/// Keys are kept sorted so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontmatterRecord(BTreeMap<String, FrontmatterValue>);

impl FrontmatterRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FrontmatterValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FrontmatterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.0.get(key)
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<FrontmatterValue> {
        self.0.remove(key)
    }

    /// Whether the field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FrontmatterValue)> {
        self.0.iter()
    }

    /// Field rendered as text, for any scalar type.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(ToString::to_string)
    }

    /// Whether the record should appear in its category's sequence.
    ///
    /// Only an explicit boolean `false` hides a record.
    pub fn is_published(&self) -> bool {
        !matches!(self.0.get("published"), Some(FrontmatterValue::Bool(false)))
    }

    /// Remove and return a field as text; empty strings count as absent.
    pub fn take_text(&mut self, key: &str) -> Option<String> {
        let text = self.0.remove(key)?.to_string();
        (!text.is_empty()).then_some(text)
    }

    /// Remove a field and return it if it is an integer.
    ///
    /// A value of any other type is dropped with a warning, so a typed
    /// field never shares its key with a leftover extra.
    pub fn take_i64(&mut self, key: &str) -> Option<i64> {
        let value = self.0.remove(key)?;
        let number = value.as_i64();
        if number.is_none() {
            warn!(key, %value, "ignoring non-integer frontmatter value");
        }
        number
    }

    /// Remove a field and return it if it is a boolean.
    ///
    /// A value of any other type is dropped with a warning.
    pub fn take_bool(&mut self, key: &str) -> Option<bool> {
        let value = self.0.remove(key)?;
        let flag = value.as_bool();
        if flag.is_none() {
            warn!(key, %value, "ignoring non-boolean frontmatter value");
        }
        flag
    }

    /// Consume the record into its underlying map.
    pub fn into_inner(self) -> BTreeMap<String, FrontmatterValue> {
        self.0
    }
}

impl<K: Into<String>, V: Into<FrontmatterValue>> FromIterator<(K, V)> for FrontmatterRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(FrontmatterValue::from(true).to_string(), "true");
        assert_eq!(FrontmatterValue::from(2024_i64).to_string(), "2024");
        assert_eq!(FrontmatterValue::from(2.5).to_string(), "2.5");
        assert_eq!(FrontmatterValue::from("Enscape").to_string(), "Enscape");
    }

    #[test]
    fn test_value_as_i64_accepts_whole_floats() {
        assert_eq!(FrontmatterValue::Float(4.0).as_i64(), Some(4));
        assert_eq!(FrontmatterValue::Float(4.5).as_i64(), None);
        assert_eq!(FrontmatterValue::from("4").as_i64(), None);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let record = FrontmatterRecord::new()
            .with("title", "Urban Office")
            .with("id", 2_i64)
            .with("featured", true);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"featured": true, "id": 2, "title": "Urban Office"})
        );
    }

    #[test]
    fn test_is_published() {
        assert!(FrontmatterRecord::new().is_published());
        assert!(FrontmatterRecord::new().with("published", true).is_published());
        assert!(!FrontmatterRecord::new().with("published", false).is_published());
        // Only a real boolean hides a record.
        assert!(FrontmatterRecord::new().with("published", "no").is_published());
    }

    #[test]
    fn test_take_text_renders_scalars_and_skips_empty() {
        let mut record = FrontmatterRecord::new()
            .with("copyrightYear", 2024_i64)
            .with("tagline", "");
        assert_eq!(record.take_text("copyrightYear").as_deref(), Some("2024"));
        assert_eq!(record.take_text("tagline"), None);
        assert!(record.is_empty());
    }

    #[test]
    fn test_take_i64_drops_non_numeric() {
        let mut record = FrontmatterRecord::new().with("order", "first");
        assert_eq!(record.take_i64("order"), None);
        assert!(!record.contains_key("order"));
    }

    #[test]
    fn test_take_bool() {
        let mut record = FrontmatterRecord::new().with("featured", true);
        assert_eq!(record.take_bool("featured"), Some(true));
        assert!(!record.contains_key("featured"));

        let mut record = FrontmatterRecord::new().with("featured", "yes");
        assert_eq!(record.take_bool("featured"), None);
        assert!(record.is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let record: FrontmatterRecord = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert_eq!(record.text("b").as_deref(), Some("2"));
    }
}
