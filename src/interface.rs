//! Interfaces that generated types can mimic.
//!
//! Mimicry only needs a snapshot of operation names. Any type that can list
//! its operations implements [`Reflect`]; [`TargetType`] is a plain, serde
//! friendly description for consumers that do not have one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NaughtResult;
use crate::value::Value;

/// Operations every generated type answers without a minimal base.
pub const BASIC_OPERATIONS: &[&str] = &["!", "!=", "==", "__id__", "class", "equal?"];

/// Operations of the universal root type. Mimicry never stubs these.
pub const ROOT_OPERATIONS: &[&str] = &[
    "!",
    "!=",
    "==",
    "__id__",
    "class",
    "equal?",
    "frozen?",
    "hash",
    "inspect",
    "instance_of?",
    "is_a?",
    "kind_of?",
    "nil?",
    "object_id",
    "respond_to?",
    "to_s",
];

/// Ancestors of the minimal base type.
pub const BASIC_ANCESTORS: &[&str] = &["BasicObject"];

/// Ancestors of the root object type.
pub const OBJECT_ANCESTORS: &[&str] = &["Object", "BasicObject"];

/// Returns true if `name` is an operation of the universal root type.
#[must_use]
pub fn is_root_operation(name: &str) -> bool {
    ROOT_OPERATIONS.contains(&name)
}

/// Read-only reflection over a type whose interface can be mimicked.
pub trait Reflect: fmt::Debug {
    /// Name used in descriptions and type checks.
    fn type_name(&self) -> &str;

    /// Operation names, in declaration order, optionally with inherited ones.
    fn operation_names(&self, include_inherited: bool) -> Vec<String>;

    /// The type itself followed by everything it inherits from, nearest first.
    fn ancestor_names(&self) -> Vec<String>;
}

/// Declarative description of a target type.
///
/// # Examples
///
/// ```
/// use naught::{Reflect, TargetType};
///
/// let user = TargetType::new("User").operation("login");
/// let patron = TargetType::new("LibraryPatron")
///     .superclass(user)
///     .operations(["member?", "name"]);
///
/// assert_eq!(patron.operation_names(false), vec!["member?", "name"]);
/// assert_eq!(patron.operation_names(true), vec!["member?", "name", "login"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetType {
    /// Type name.
    pub name: String,
    /// Operations declared directly on the type.
    #[serde(default)]
    pub operations: Vec<String>,
    /// Modules mixed into the type, in inclusion order.
    #[serde(default)]
    pub mixins: Vec<TargetType>,
    /// Parent type.
    #[serde(default)]
    pub superclass: Option<Box<TargetType>>,
}

impl TargetType {
    /// Creates a type with no operations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
            mixins: Vec::new(),
            superclass: None,
        }
    }

    /// Declares one operation.
    #[must_use]
    pub fn operation(mut self, name: impl Into<String>) -> Self {
        self.operations.push(name.into());
        self
    }

    /// Declares several operations.
    #[must_use]
    pub fn operations<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.operations.extend(names.into_iter().map(Into::into));
        self
    }

    /// Mixes a module into the type. Later mixins take precedence.
    #[must_use]
    pub fn include(mut self, mixin: TargetType) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Sets the parent type.
    #[must_use]
    pub fn superclass(mut self, parent: TargetType) -> Self {
        self.superclass = Some(Box::new(parent));
        self
    }

    /// Decodes an interface snapshot.
    ///
    /// ```
    /// use naught::TargetType;
    ///
    /// let point = TargetType::from_json(r#"{"name":"Point","operations":["x","y"]}"#).unwrap();
    /// assert_eq!(point.operations, vec!["x", "y"]);
    /// ```
    pub fn from_json(json: &str) -> NaughtResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes this description as an interface snapshot.
    pub fn to_json(&self) -> NaughtResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Type-identity check: true when `value` is a null object whose generated
    /// type impersonates this one (directly or through its ancestors).
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        value
            .as_null_object()
            .is_some_and(|obj| obj.is_a(&self.name))
    }

    // Nearest-first lookup chain: self, mixins (newest first), then the parent's chain.
    fn lookup_chain(&self) -> Vec<&TargetType> {
        let mut chain = vec![self];
        for mixin in self.mixins.iter().rev() {
            chain.extend(mixin.lookup_chain());
        }
        if let Some(parent) = &self.superclass {
            chain.extend(parent.lookup_chain());
        }
        chain
    }
}

impl Reflect for TargetType {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn operation_names(&self, include_inherited: bool) -> Vec<String> {
        if !include_inherited {
            return dedup(self.operations.iter().cloned());
        }
        dedup(
            self.lookup_chain()
                .into_iter()
                .flat_map(|ty| ty.operations.iter().cloned()),
        )
    }

    fn ancestor_names(&self) -> Vec<String> {
        dedup(self.lookup_chain().into_iter().map(|ty| ty.name.clone()))
    }
}

fn dedup(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
