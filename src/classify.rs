//! Classification functions bound to one generated type.
//!
//! `null`, `maybe`, `just` and `actual` decide whether a value counts as
//! absent and convert between ordinary values, null objects and `nil`.
//! A value is null-equivalent when it is an instance of the bound type or a
//! member of its equivalence set. Instances of other generated types are
//! ordinary values here.
//!
//! | Function | null-equivalent | ordinary | bound instance |
//! |----------|-----------------|----------|----------------|
//! | `null`   | new instance    | error    | unchanged      |
//! | `maybe`  | new instance    | unchanged| unchanged      |
//! | `just`   | error           | unchanged| error          |
//! | `actual` | `nil`           | unchanged| `nil`          |

use crate::class::{CallSite, NullClass, NullObject};
use crate::equivalents::EquivalenceSet;
use crate::error::{NaughtError, NaughtResult};
use crate::value::Value;

/// The classification module of one generated type.
///
/// The equivalence set is shared by reference, so values appended after
/// the classifier was obtained still count.
///
/// # Example
/// ```
/// use naught::Value;
///
/// let null_class = naught::build(|b| {
///     b.null_equivalents().push("");
/// });
/// let c = null_class.classifier();
///
/// assert!(c.maybe(Value::from("")).is_null_object());
/// assert_eq!(c.maybe(Value::from("hi")), Value::from("hi"));
/// assert!(c.just(Value::Nil).is_err());
/// assert_eq!(c.actual(c.maybe(Value::Nil)), Value::Nil);
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    class: NullClass,
    equivalents: EquivalenceSet,
}

impl Classifier {
    pub(crate) fn new(class: NullClass, equivalents: EquivalenceSet) -> Self {
        Self { class, equivalents }
    }

    /// The generated type this classifier is bound to.
    #[must_use]
    pub fn null_class(&self) -> &NullClass {
        &self.class
    }

    /// The equivalence set consulted on every call.
    #[must_use]
    pub fn null_equivalents(&self) -> &EquivalenceSet {
        &self.equivalents
    }

    /// Returns true if `value` is an instance of the bound type.
    #[must_use]
    pub fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::Null(obj) if obj.class() == &self.class)
    }

    /// The shared decision primitive.
    #[must_use]
    pub fn is_null_equivalent(&self, value: &Value) -> bool {
        self.is_instance(value) || self.equivalents.contains(value)
    }

    /// `Null()` with nothing passed: always a fresh null object.
    #[track_caller]
    #[must_use]
    pub fn null(&self) -> NullObject {
        self.class.materialize(CallSite::caller())
    }

    /// Coerces an absent value into a null object.
    ///
    /// # Errors
    /// `InvalidArgument` if `value` is not null-equivalent.
    #[track_caller]
    pub fn null_of(&self, value: Value) -> NaughtResult<NullObject> {
        match value {
            Value::Null(obj) if obj.class() == &self.class => Ok(obj),
            value if self.equivalents.contains(&value) => {
                Ok(self.class.materialize(CallSite::caller()))
            }
            value => {
                tracing::debug!(value = %value.inspect(), "Null() rejected ordinary value");
                Err(NaughtError::not_null(&value))
            }
        }
    }

    /// Wraps absent values, passes everything else through.
    #[track_caller]
    #[must_use]
    pub fn maybe(&self, value: Value) -> Value {
        if self.is_instance(&value) || !self.equivalents.contains(&value) {
            return value;
        }
        Value::Null(self.class.materialize(CallSite::caller()))
    }

    /// `maybe` applied to the result of `block`.
    #[track_caller]
    pub fn maybe_with<F>(&self, block: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        self.maybe(block())
    }

    /// Asserts that `value` is not absent.
    ///
    /// # Errors
    /// `InvalidArgument` if `value` is null-equivalent.
    pub fn just(&self, value: Value) -> NaughtResult<Value> {
        if self.is_null_equivalent(&value) {
            tracing::debug!(value = %value.inspect(), "Just() rejected null value");
            return Err(NaughtError::null_value(&value));
        }
        Ok(value)
    }

    /// `just` applied to the result of `block`.
    ///
    /// # Errors
    /// `InvalidArgument` if the block's result is null-equivalent.
    pub fn just_with<F>(&self, block: F) -> NaughtResult<Value>
    where
        F: FnOnce() -> Value,
    {
        self.just(block())
    }

    /// Converts absent values to `nil` for code unaware of null objects.
    #[must_use]
    pub fn actual(&self, value: Value) -> Value {
        if self.is_null_equivalent(&value) {
            return Value::Nil;
        }
        value
    }

    /// `actual` applied to the result of `block`.
    pub fn actual_with<F>(&self, block: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        self.actual(block())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;

    fn classifier() -> Classifier {
        build(|b| {
            b.null_equivalents().push("");
        })
        .classifier()
    }

    #[test]
    fn test_null_without_argument() {
        let c = classifier();
        let null = c.null();
        assert_eq!(null.class(), c.null_class());
    }

    #[test]
    fn test_null_of_equivalents() {
        let c = classifier();
        assert!(c.null_of(Value::Nil).is_ok());
        assert!(c.null_of(Value::from("")).is_ok());
    }

    #[test]
    fn test_null_of_is_idempotent() {
        let c = classifier();
        let null = c.null();
        let again = c.null_of(Value::Null(null.clone())).unwrap();
        assert!(again.same(&null));
    }

    #[test]
    fn test_null_of_rejects_ordinary_values() {
        let c = classifier();
        let err = c.null_of(Value::Bool(false)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(format!("{err}").contains("false is not null!"));
        assert!(c.null_of(Value::from("hello")).is_err());
    }

    #[test]
    fn test_maybe() {
        let c = classifier();
        assert!(c.maybe(Value::Nil).is_null_object());
        assert!(c.maybe(Value::from("")).is_null_object());
        assert_eq!(c.maybe(Value::Bool(false)), Value::Bool(false));

        let null = Value::Null(c.null());
        assert_eq!(c.maybe(null.clone()), null);
    }

    #[test]
    fn test_maybe_with_block() {
        let c = classifier();
        assert!(c.maybe_with(|| Value::Nil).is_null_object());
        assert_eq!(c.maybe_with(|| Value::from("foo")), Value::from("foo"));
    }

    #[test]
    fn test_just() {
        let c = classifier();
        assert_eq!(c.just(Value::Bool(false)).unwrap(), Value::Bool(false));
        assert!(c.just(Value::Nil).unwrap_err().is_invalid_argument());
        assert!(c.just(Value::from("")).is_err());
        assert!(c.just(Value::Null(c.null())).is_err());
        assert!(c.just_with(|| Value::Nil).is_err());
        assert_eq!(c.just_with(|| Value::from("foo")).unwrap(), Value::from("foo"));
    }

    #[test]
    fn test_actual() {
        let c = classifier();
        assert_eq!(c.actual(Value::Null(c.null())), Value::Nil);
        assert_eq!(c.actual(Value::Bool(false)), Value::Bool(false));
        assert_eq!(c.actual(Value::Nil), Value::Nil);
        assert_eq!(c.actual(Value::from("")), Value::Nil);
        assert_eq!(c.actual_with(|| Value::from("foo")), Value::from("foo"));
    }

    #[test]
    fn test_other_generated_types_are_ordinary() {
        let c = classifier();
        let foreign = build(|_| {}).new().unwrap();
        let value = Value::Null(foreign);
        assert!(!c.is_null_equivalent(&value));
        assert!(c.null_of(value.clone()).is_err());
        assert_eq!(c.maybe(value.clone()), value);
        assert_eq!(c.just(value.clone()).unwrap(), value);
    }

    #[test]
    fn test_late_equivalents_apply() {
        let c = classifier();
        assert_eq!(c.maybe(Value::Int(0)), Value::Int(0));
        c.null_class().null_equivalents().push(0);
        assert!(c.maybe(Value::Int(0)).is_null_object());
    }

    #[test]
    fn test_traced_construction_site() {
        let c = build(|b| {
            b.traceable();
        })
        .classifier();
        let null = c.null();
        let line = line!() - 1;
        assert_eq!(null.line(), Some(line));
        assert_eq!(null.file(), Some(file!()));

        let maybe = c.maybe(Value::Nil);
        let line = line!() - 1;
        assert_eq!(maybe.as_null_object().and_then(NullObject::line), Some(line));
    }

    #[test]
    fn test_singleton_hands_out_shared_instance() {
        let class = build(|b| {
            b.singleton();
        });
        let c = class.classifier();
        let a = c.null();
        let b = c.null_of(Value::Nil).unwrap();
        assert!(a.same(&b));
        assert!(a.same(&class.instance().unwrap()));
    }
}
