//! Zero-value conversion sets and splat helpers.
//!
//! The explicit set answers the ordinary "convert me" operations with empty
//! or zero values. The implicit set answers the coercions used when a value
//! is destructured or spliced into a string.

use std::collections::BTreeMap;

use crate::error::NaughtResult;
use crate::method::{Method, MethodTable};
use crate::value::Value;

/// Module name shown in ancestor lists for the explicit set.
pub const EXPLICIT_MODULE: &str = "Naught::ExplicitConversions";

/// Module name shown in ancestor lists for the implicit set.
pub const IMPLICIT_MODULE: &str = "Naught::ImplicitConversions";

/// Explicit conversions and the zero value each returns.
#[must_use]
pub fn explicit_zero_values() -> Vec<(&'static str, Value)> {
    vec![
        ("to_s", Value::Str(String::new())),
        ("to_a", Value::Array(Vec::new())),
        ("to_i", Value::Int(0)),
        ("to_f", Value::Float(0.0)),
        ("to_c", Value::Complex { re: 0.0, im: 0.0 }),
        ("to_r", Value::Rational { numer: 0, denom: 1 }),
        ("to_h", Value::Map(BTreeMap::new())),
    ]
}

/// Implicit conversions and the zero value each returns.
#[must_use]
pub fn implicit_zero_values() -> Vec<(&'static str, Value)> {
    vec![
        ("to_ary", Value::Array(Vec::new())),
        ("to_str", Value::Str(String::new())),
    ]
}

pub(crate) fn method_table(values: Vec<(&'static str, Value)>) -> MethodTable {
    values
        .into_iter()
        .map(|(name, zero)| (name.to_string(), Method::returning(zero)))
        .collect()
}

/// Expands a value the way a splat does.
///
/// Arrays expand to their elements. Null objects that answer `to_ary` with an
/// array expand to that array. Everything else becomes a one-element list.
pub fn splat(value: &Value) -> NaughtResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items.clone()),
        Value::Null(obj) if obj.responds_to_resolved("to_ary") => {
            match obj.send("to_ary", &[])? {
                Value::Array(items) => Ok(items),
                Value::Nil => Ok(vec![value.clone()]),
                other => Ok(vec![other]),
            }
        }
        other => Ok(vec![other.clone()]),
    }
}

/// Multiple assignment: splats `value` and pads or truncates to `targets`
/// slots with `nil`.
///
/// ```
/// use naught::{conversions::destructure, Value};
///
/// let parts = destructure(&Value::Array(vec![Value::Int(1)]), 2).unwrap();
/// assert_eq!(parts, vec![Value::Int(1), Value::Nil]);
/// ```
pub fn destructure(value: &Value, targets: usize) -> NaughtResult<Vec<Value>> {
    let mut parts = splat(value)?;
    parts.resize(targets, Value::Nil);
    Ok(parts)
}
