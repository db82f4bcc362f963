//! Operation bodies attached to generated types.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::class::NullObject;
use crate::error::NaughtResult;
use crate::value::Value;

type MethodFn = dyn Fn(&NullObject, &[Value]) -> NaughtResult<Value>;

/// A callable operation body.
///
/// Bodies receive the receiver and the call arguments. Cloning is cheap.
#[derive(Clone)]
pub struct Method {
    body: Rc<MethodFn>,
}

impl Method {
    /// Wraps an arbitrary body.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&NullObject, &[Value]) -> NaughtResult<Value> + 'static,
    {
        Self {
            body: Rc::new(body),
        }
    }

    /// A body that ignores its arguments and returns a fixed value.
    pub fn returning(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Invokes the body.
    pub fn call(&self, receiver: &NullObject, args: &[Value]) -> NaughtResult<Value> {
        (self.body)(receiver, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

/// Operation name to body.
pub type MethodTable = HashMap<String, Method>;

/// What generated stubs return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StubStrategy {
    /// Stubs return `nil`.
    #[default]
    ReturnsNothing,
    /// Stubs return the receiver, so calls can be chained.
    ReturnsSelf,
}

impl StubStrategy {
    /// Builds a stub body for this strategy. Stubs accept any arguments.
    #[must_use]
    pub fn stub(self) -> Method {
        match self {
            Self::ReturnsNothing => Method::new(|_, _| Ok(Value::Nil)),
            Self::ReturnsSelf => Method::new(|receiver, _| Ok(Value::Null(receiver.clone()))),
        }
    }
}

impl fmt::Display for StubStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReturnsNothing => write!(f, "returns-nothing"),
            Self::ReturnsSelf => write!(f, "returns-self"),
        }
    }
}
