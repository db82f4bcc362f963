//! Runtime values that flow through null objects.
//!
//! Generated types are dynamic: operations take and return `Value`s. Data
//! variants behave structurally; `Null` and `Class` carry identity.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::class::{NullClass, NullObject};

/// A value passed to or returned from an operation.
///
/// # Examples
///
/// ```
/// use naught::Value;
///
/// let nil = Value::Nil;
/// let text = Value::from("hello");
///
/// assert!(nil.is_nil());
/// assert!(!nil.is_truthy());
/// assert!(text.is_truthy());
/// assert_eq!(text.inspect(), "\"hello\"");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// The universal absence marker.
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex {
        re: f64,
        im: f64,
    },
    Rational {
        numer: i64,
        denom: i64,
    },
    Str(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// An instance of a generated null type.
    #[serde(skip)]
    Null(NullObject),
    /// A generated null type itself.
    #[serde(skip)]
    Class(NullClass),
}

impl Value {
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub const fn is_null_object(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Only `Nil` and `Bool(false)` are falsy.
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_null_object(&self) -> Option<&NullObject> {
        match self {
            Self::Null(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Complex { .. } => "complex",
            Self::Rational { .. } => "rational",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Null(_) => "null",
            Self::Class(_) => "class",
        }
    }

    /// Debug representation used in error messages.
    ///
    /// Null objects render through their own `inspect` operation, so a
    /// customized or mimicking type shows up the way it describes itself.
    #[must_use]
    pub fn inspect(&self) -> String {
        match self {
            Self::Nil => "nil".to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format!("{v:?}"),
            Self::Complex { re, im } => {
                let sign = if *im < 0.0 { '-' } else { '+' };
                format!("({}{sign}{}i)", format_number(*re), format_number(im.abs()))
            }
            Self::Rational { numer, denom } => format!("({numer}/{denom})"),
            Self::Str(v) => format!("{v:?}"),
            Self::Array(items) => {
                let inner: Vec<String> = items.iter().map(Self::inspect).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Map(entries) => {
                if entries.is_empty() {
                    return "{}".to_string();
                }
                let inner: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{k:?} => {}", v.inspect()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::Null(obj) => obj.inspect(),
            Self::Class(class) => class.display_name(),
        }
    }
}

// Whole floats print without a fractional part inside complex literals.
// Past 2^53 the integer path would saturate, so large magnitudes keep `{v}`.
#[allow(clippy::cast_possible_truncation)]
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 2f64.powi(53) {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Nil
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => Ok(()),
            Self::Str(v) => write!(f, "{v}"),
            other => write!(f, "{}", other.inspect()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<NullObject> for Value {
    fn from(v: NullObject) -> Self {
        Self::Null(v)
    }
}

impl From<NullClass> for Value {
    fn from(v: NullClass) -> Self {
        Self::Class(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(0).is_truthy());
        assert!(Value::from("").is_truthy());
    }

    #[test]
    fn test_inspect_zero_values() {
        assert_eq!(Value::Float(0.0).inspect(), "0.0");
        assert_eq!(Value::Complex { re: 0.0, im: 0.0 }.inspect(), "(0+0i)");
        assert_eq!(Value::Rational { numer: 0, denom: 1 }.inspect(), "(0/1)");
        assert_eq!(Value::Array(vec![]).inspect(), "[]");
        assert_eq!(Value::Map(BTreeMap::new()).inspect(), "{}");
    }

    #[test]
    fn test_inspect_large_complex_parts() {
        let big = Value::Complex { re: 1e300, im: 0.0 };
        assert_eq!(big.inspect(), format!("({}+0i)", 1e300_f64));
        assert_ne!(big.inspect(), "(9223372036854775807+0i)");
        assert_eq!(Value::Complex { re: 3.0, im: -2.5 }.inspect(), "(3-2.5i)");
        assert_eq!(
            Value::Complex { re: f64::INFINITY, im: 0.0 }.inspect(),
            "(inf+0i)"
        );
    }

    #[test]
    fn test_inspect_nested() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), Value::Array(vec![Value::Int(1), Value::Nil]));
        assert_eq!(Value::Map(map).inspect(), "{\"k\" => [1, nil]}");
    }

    #[test]
    fn test_display_nil_is_empty() {
        assert_eq!(Value::Nil.to_string(), "");
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::Int(3).to_string(), "3");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_serde_data_variant() {
        let json = serde_json::to_string(&Value::Int(7)).unwrap();
        assert_eq!(json, r#"{"type":"int","value":7}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Int(7));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::Complex { re: 0.0, im: 0.0 }.type_name(), "complex");
    }
}
