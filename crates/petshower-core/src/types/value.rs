//! Metadata and row values.
//!
//! This module provides the [`Value`] enum, which represents everything a
//! metadata map, an option entry, or a custom-table row cell can hold.
//!
//! # Example
//!
//! ```
//! use petshower_core::Value;
//!
//! let name: Value = "Rex".into();
//! let age: Value = 4i64.into();
//! let weight: Value = 17.5f64.into();
//!
//! assert_eq!(name.as_str(), Some("Rex"));
//! assert_eq!(age.as_int(), Some(4));
//! assert_eq!(weight.as_float(), Some(17.5));
//! ```

use serde::{Deserialize, Serialize};

/// A value stored in an entity's metadata map, an option entry, or a
/// custom-table row.
///
/// Metadata values are untyped at the store level; the reference schema in
/// [`reference_schema`] is what distinguishes an `Int` that happens to be a
/// foreign key from an `Int` that is just a number.
///
/// [`reference_schema`]: super::reference_schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// List of values, e.g. a list of entity ids.
    Array(Vec<Value>),
}

impl Value {
    /// Get the value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float. Integers widen losslessly enough for the
    /// scalar fields this engine carries.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a string slice, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a slice of values, if it is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Vec<i64>> for Value {
    fn from(items: Vec<i64>) -> Self {
        Self::Array(items.into_iter().map(Value::Int).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(5i64).as_int(), Some(5));
        assert_eq!(Value::from(2.5f64).as_float(), Some(2.5));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert!(Value::Null.is_null());
        assert_eq!(Value::from(5i64).as_str(), None);
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
    }

    #[test]
    fn id_list_from_ints() {
        let v = Value::from(vec![1i64, 2, 3]);
        let items = v.as_array().expect("array");
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_int(), Some(3));
    }

    #[test]
    fn untagged_serde_roundtrip() {
        let v = Value::Array(vec![Value::Int(1), Value::String("a".into()), Value::Null]);
        let json = serde_json::to_string(&v).expect("serialize");
        assert_eq!(json, r#"[1,"a",null]"#);
        let back: Value = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, v);
    }
}
