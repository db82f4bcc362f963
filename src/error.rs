//! Error types for naught.
//!
//! Null objects fail in exactly two ways: a classification function is handed
//! a value of the wrong shape, or an operation is sent to a generated type
//! whose interface does not include it. Both are typed with thiserror so
//! callers can match on the specific condition.

use thiserror::Error;

use crate::value::Value;

/// Top-level error type for naught.
#[derive(Debug, Error)]
pub enum NaughtError {
    /// A classification function rejected its input.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description including the rejected value's representation.
        message: String,
    },

    /// The receiver has no operation with this name.
    #[error("undefined method '{operation}' for {receiver}")]
    NoMethod {
        /// Operation that failed to resolve.
        operation: String,
        /// Representation of the receiver.
        receiver: String,
    },

    /// An interface snapshot could not be decoded.
    #[error("Invalid interface snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl NaughtError {
    /// Rejection raised by `Null` for an ordinary value.
    #[must_use]
    pub fn not_null(value: &Value) -> Self {
        Self::InvalidArgument {
            message: format!("{} is not null!", value.inspect()),
        }
    }

    /// Rejection raised by `Just` for an absent value.
    #[must_use]
    pub fn null_value(value: &Value) -> Self {
        Self::InvalidArgument {
            message: format!("Null value: {}", value.inspect()),
        }
    }

    /// Creates a resolution failure.
    #[must_use]
    pub fn no_method(operation: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self::NoMethod {
            operation: operation.into(),
            receiver: receiver.into(),
        }
    }

    /// Returns true if this is an invalid-argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns true if this is a resolution failure.
    #[must_use]
    pub const fn is_no_method(&self) -> bool {
        matches!(self, Self::NoMethod { .. })
    }

    /// Returns true if this is a resolution failure for `operation`.
    #[must_use]
    pub fn is_no_method_for(&self, operation: &str) -> bool {
        matches!(self, Self::NoMethod { operation: op, .. } if op == operation)
    }
}

/// Result type alias for naught operations.
pub type NaughtResult<T> = Result<T, NaughtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_null_message() {
        let err = NaughtError::not_null(&Value::from("hello"));
        assert!(err.is_invalid_argument());
        let msg = format!("{err}");
        assert!(msg.contains("\"hello\" is not null!"));
    }

    #[test]
    fn test_null_value_message() {
        let err = NaughtError::null_value(&Value::Nil);
        assert!(err.is_invalid_argument());
        assert!(!err.is_no_method());
        assert!(format!("{err}").contains("Null value: nil"));
    }

    #[test]
    fn test_no_method() {
        let err = NaughtError::no_method("foobar", "<null:Logger>");
        assert!(err.is_no_method());
        assert!(err.is_no_method_for("foobar"));
        assert!(!err.is_no_method_for("info"));
        let msg = format!("{err}");
        assert!(msg.contains("foobar"));
        assert!(msg.contains("<null:Logger>"));
    }

    #[test]
    fn test_snapshot_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: NaughtError = json_err.into();
        assert!(matches!(err, NaughtError::Snapshot(_)));
        assert!(format!("{err}").contains("Invalid interface snapshot"));
    }
}
