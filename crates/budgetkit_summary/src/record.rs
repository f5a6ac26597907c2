//! Flat row record model shared by the collector, calculator and exporter.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////
// #region FieldValue

/// One field value in a row record.
///
/// Serializes untagged, so a record round-trips as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumFieldValue {
    /// Missing/blank value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl EnumFieldValue {
    /// Whether the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value.
    ///
    /// Finite numbers and numeric text resolve; everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Text view of the value (`Text` only).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Boolean view of the value (`Bool` only).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for EnumFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for EnumFieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for EnumFieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for EnumFieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for EnumFieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for EnumFieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EnumFieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<EnumFieldValue>> From<Option<T>> for EnumFieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowRecord

/// Flat mapping from field name to value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRecord {
    fields: BTreeMap<String, EnumFieldValue>,
}

impl RowRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&EnumFieldValue> {
        self.fields.get(key)
    }

    /// Numeric value for `key`, `None` when absent, null or non-numeric.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(EnumFieldValue::as_f64)
    }

    /// Numeric value for `key` with every non-numeric case folded to `0.0`.
    pub fn get_number_or_zero(&self, key: &str) -> f64 {
        self.get_number(key).unwrap_or(0.0)
    }

    /// Text value for `key` (`Text` values only).
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(EnumFieldValue::as_str)
    }

    /// Insert or replace one field, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<EnumFieldValue>,
    ) -> Option<EnumFieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove one field.
    pub fn remove(&mut self, key: &str) -> Option<EnumFieldValue> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &EnumFieldValue)> {
        self.fields.iter()
    }

    /// Overlay every field of `other` onto `self`.
    pub fn extend_from(&mut self, other: &RowRecord) {
        for (key, value) in other.iter() {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RowRecord
where
    K: Into<String>,
    V: Into<EnumFieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{EnumFieldValue, RowRecord};

    #[test]
    fn number_view_folds_text_and_rejects_non_numeric() {
        let record: RowRecord = [
            ("a", EnumFieldValue::Number(10.5)),
            ("b", EnumFieldValue::from(" 1200.25 ")),
            ("c", EnumFieldValue::from("n/a")),
            ("d", EnumFieldValue::Null),
            ("e", EnumFieldValue::Bool(true)),
            ("f", EnumFieldValue::Number(f64::NAN)),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.get_number("a"), Some(10.5));
        assert_eq!(record.get_number("b"), Some(1200.25));
        assert_eq!(record.get_number("c"), None);
        assert_eq!(record.get_number("d"), None);
        assert_eq!(record.get_number("e"), None);
        assert_eq!(record.get_number_or_zero("f"), 0.0);
        assert_eq!(record.get_number_or_zero("missing"), 0.0);
    }

    #[test]
    fn record_serializes_as_flat_json_object() {
        let mut record = RowRecord::new();
        record.insert("cost_center_code", "CC100");
        record.insert("payroll_le", 25_000.0);
        record.insert("executive", EnumFieldValue::Null);
        record.insert("is_active", true);

        let txt = serde_json::to_string(&record).expect("serialize");
        assert_eq!(
            txt,
            r#"{"cost_center_code":"CC100","executive":null,"is_active":true,"payroll_le":25000.0}"#
        );

        let parsed: RowRecord = serde_json::from_str(&txt).expect("deserialize");
        assert_eq!(parsed, record);
    }
}
