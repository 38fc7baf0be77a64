//! Property values and ordered property bags.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::RecordRef;

/// A property value.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value. Never emitted.
    #[default]
    Null,
    /// Rendered as `true` / `false`.
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Reference to a named record, rendered as its id.
    Ref(RecordRef),
    /// One line per non-null element, each repeating the key.
    List(Vec<Value>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Ref(r) => Some(r.id()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts into a list, wrapping a scalar as a single element.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            other => vec![other],
        }
    }

    /// Returns the scalar values this value emits, skipping nulls.
    pub fn scalars(&self) -> Vec<&Value> {
        match self {
            Value::Null => Vec::new(),
            Value::List(items) => items.iter().filter(|v| !v.is_null()).collect(),
            other => vec![other],
        }
    }
}

/// Formats a float the way the engine's data files spell them: integral
/// values keep a trailing `.0`.
fn format_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        write!(f, "{v:.1}")
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => format_float(f, *v),
            Value::Str(s) => f.write_str(s),
            Value::Ref(r) => f.write_str(r.id()),
            Value::List(items) => {
                let mut first = true;
                for item in items.iter().filter(|v| !v.is_null()) {
                    if !first {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<RecordRef> for Value {
    fn from(v: RecordRef) -> Self {
        Value::Ref(v)
    }
}

impl From<&RecordRef> for Value {
    fn from(v: &RecordRef) -> Self {
        Value::Ref(v.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// An insertion-ordered property bag.
///
/// Setting an existing key replaces its value in place, so encoded line
/// order follows first insertion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
    entries: Vec<(String, Value)>,
}

impl Properties {
    /// Creates an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, returning the bag (builder form of [`Properties::set`]).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a property, replacing any previous value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Sets a property only if the key is not present yet.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if !self.contains_key(&key) {
            self.entries.push((key, value.into()));
        }
    }

    /// Appends to a property: the first value is stored as a scalar, the
    /// second promotes it to a two-element list, later ones extend the list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, Value::List(items))) => items.push(value),
            Some((_, slot)) => {
                let first = std::mem::take(slot);
                *slot = Value::List(vec![first, value]);
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Removes a property, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterates over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalizes a property to list shape if present.
    pub fn normalize_list(&mut self, key: &str) {
        if let Some(slot) = self.get_mut(key) {
            if !matches!(slot, Value::List(_)) {
                let scalar = std::mem::take(slot);
                *slot = Value::List(vec![scalar]);
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Properties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl IntoIterator for Properties {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
