//! The set of values treated as absent.
//!
//! One set is created per builder. The builder, the generated type and its
//! bound classifier all hold handles to the same storage, so values appended
//! late are seen by every classification call made afterwards.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Shared, mutable list of null-equivalent values.
///
/// Starts as `[nil]`. Cloning the handle shares the storage.
///
/// # Examples
///
/// ```
/// use naught::{EquivalenceSet, Value};
///
/// let set = EquivalenceSet::new();
/// let alias = set.clone();
/// alias.push("");
///
/// assert!(set.contains(&Value::Nil));
/// assert!(set.contains(&Value::from("")));
/// assert!(!set.contains(&Value::Bool(false)));
/// ```
#[derive(Clone)]
pub struct EquivalenceSet {
    values: Rc<RefCell<Vec<Value>>>,
}

impl EquivalenceSet {
    /// Creates a set holding only the absent sentinel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Rc::new(RefCell::new(vec![Value::Nil])),
        }
    }

    /// Appends a value to treat as absent.
    pub fn push(&self, value: impl Into<Value>) -> &Self {
        self.values.borrow_mut().push(value.into());
        self
    }

    /// Appends every value from `values`.
    pub fn extend<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        // Collected before borrowing: the iterator may read this set.
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.values.borrow_mut().extend(values);
    }

    /// Membership test; defines "is absent" for ordinary values.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.values.borrow().iter().any(|v| v == value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Copies the current contents.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.values.borrow().clone()
    }

    /// Returns true if both handles point at the same storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }
}

impl Default for EquivalenceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EquivalenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_nil() {
        let set = EquivalenceSet::new();
        assert_eq!(set.len(), 1);
        assert_eq!(set.to_vec(), vec![Value::Nil]);
    }

    #[test]
    fn test_clone_shares_storage() {
        let set = EquivalenceSet::new();
        let alias = set.clone();
        alias.push(0);
        assert!(set.contains(&Value::Int(0)));
        assert!(set.shares_storage_with(&alias));
        assert!(!set.shares_storage_with(&EquivalenceSet::new()));
    }

    #[test]
    fn test_extend_and_order() {
        let set = EquivalenceSet::new();
        set.extend(["", "none"]);
        assert_eq!(
            set.to_vec(),
            vec![Value::Nil, Value::from(""), Value::from("none")]
        );
    }

    #[test]
    fn test_extend_with_iterator_reading_the_set() {
        let set = EquivalenceSet::new();
        let alias = set.clone();
        set.extend(
            vec![Value::Nil, Value::from(""), Value::from("")]
                .into_iter()
                .filter(|v| !alias.contains(v)),
        );
        assert_eq!(
            set.to_vec(),
            vec![Value::Nil, Value::from(""), Value::from("")]
        );

        set.extend(
            vec![Value::from(""), Value::Int(0)]
                .into_iter()
                .filter(|v| !set.contains(v)),
        );
        assert_eq!(set.len(), 4);
        assert!(set.contains(&Value::Int(0)));
    }

    #[test]
    fn test_contains_is_structural() {
        let set = EquivalenceSet::new();
        set.push(Value::Array(vec![]));
        assert!(set.contains(&Value::Array(vec![])));
        assert!(!set.contains(&Value::Array(vec![Value::Nil])));
    }
}
