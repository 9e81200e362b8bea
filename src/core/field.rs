//! Ordered structured fields attached to log records
//!
//! Fields are kept as an ordered list of key/value pairs rather than a
//! map: insertion order is part of the record contract, and duplicate
//! keys are permitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
        }
    }

    /// Feed a canonical byte encoding of the value into a hasher.
    ///
    /// Used by the deduplication fingerprint; the encoding must be
    /// identical for identical values regardless of thread.
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            FieldValue::String(s) => {
                state.write_u8(0);
                state.write(s.as_bytes());
            }
            FieldValue::Int(i) => {
                state.write_u8(1);
                state.write_i64(*i);
            }
            FieldValue::Float(f) => {
                state.write_u8(2);
                state.write_u64(f.to_bits());
            }
            FieldValue::Bool(b) => {
                state.write_u8(3);
                state.write_u8(*b as u8);
            }
            FieldValue::Null => state.write_u8(4),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(i: usize) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<std::time::Duration> for FieldValue {
    fn from(d: std::time::Duration) -> Self {
        FieldValue::String(format!("{:?}", d))
    }
}

/// One key/value pair on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered, duplicate-tolerant list of fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldList(Vec<Field>);

impl FieldList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a field list from a flat pair sequence.
    ///
    /// Values are consumed left to right as alternating keys and values.
    /// Misuse never aborts: a trailing element without a value appends a
    /// synthetic `error` field, and a non-string key appends a synthetic
    /// `error` field while its value is discarded.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldValue>,
    {
        let items: Vec<FieldValue> = pairs.into_iter().map(Into::into).collect();
        let mut list = Self::new();
        let mut i = 0;
        while i + 1 < items.len() {
            match &items[i] {
                FieldValue::String(key) => {
                    list.push(key.clone(), items[i + 1].clone());
                }
                other => {
                    list.push(
                        "error",
                        FieldValue::String(format!("non-string key in Fields: {}", other)),
                    );
                }
            }
            i += 2;
        }
        if items.len() % 2 != 0 {
            list.push(
                "error",
                FieldValue::String(format!(
                    "uneven key-value pairs in Fields: [{}]",
                    items[items.len() - 1]
                )),
            );
        }
        list
    }

    /// Build a field list from pre-paired entries, preserving the
    /// caller's iteration order.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut list = Self::new();
        for (k, v) in entries {
            list.push(k, v);
        }
        list
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.push(Field::new(key, value));
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|f| f.key == key)
    }

    /// First value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every field from `other` whose key is not already present.
    ///
    /// This is the context-merge rule: context fills gaps and never
    /// overwrites a per-emission field.
    pub fn merge_missing(&mut self, other: &FieldList) {
        for field in other.iter() {
            if !self.contains_key(&field.key) {
                self.0.push(field.clone());
            }
        }
    }
}

impl IntoIterator for FieldList {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Field> for FieldList {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
