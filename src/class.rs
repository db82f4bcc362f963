//! Generated null types and their instances.
//!
//! A [`TypeDescriptor`] is the mutable form deferred tasks work on. Sealing it
//! produces a [`NullClass`], which never changes afterwards. Instances
//! ([`NullObject`]) resolve operations dynamically:
//!
//! 1. caller-defined methods (the override layer)
//! 2. methods defined on the generated type
//! 3. included modules, newest first
//! 4. intrinsic operations of the base type
//! 5. `method_missing`, if one resolves through 1-3
//!
//! Anything left over is a [`NaughtError::NoMethod`].

use std::cell::OnceCell;
use std::fmt;
use std::panic::Location;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::Classifier;
use crate::equivalents::EquivalenceSet;
use crate::error::{NaughtError, NaughtResult};
use crate::interface::{Reflect, BASIC_ANCESTORS, BASIC_OPERATIONS, OBJECT_ANCESTORS, ROOT_OPERATIONS};
use crate::method::{Method, MethodTable};
use crate::value::Value;

/// Name of the catch-all operation consulted when nothing else resolves.
pub const METHOD_MISSING: &str = "method_missing";

/// Unique identifier for a generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(Uuid);

impl ClassId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClassId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a null object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Non-negative integer form, as returned by `object_id`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn as_i64(&self) -> i64 {
        ((self.0.as_u128() as u64) >> 1) as i64
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source location where a null object was created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: 0,
        }
    }

    /// Location of the caller of the current function.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// What a generated type inherits from.
#[derive(Debug, Clone, Default)]
pub enum BaseType {
    /// No inherited behavior beyond identity and equality.
    #[default]
    Minimal,
    /// The universal root type.
    Object,
    /// An impersonated target; instances pass type checks against it.
    Target(Rc<dyn Reflect>),
}

impl BaseType {
    /// Ancestor chain contributed by the base.
    #[must_use]
    pub fn ancestors(&self) -> Vec<String> {
        match self {
            Self::Minimal => BASIC_ANCESTORS.iter().map(ToString::to_string).collect(),
            Self::Object => OBJECT_ANCESTORS.iter().map(ToString::to_string).collect(),
            Self::Target(target) => {
                let mut chain = target.ancestor_names();
                chain.extend(OBJECT_ANCESTORS.iter().map(ToString::to_string));
                chain
            }
        }
    }

    /// Returns true if the base answers `op` intrinsically.
    #[must_use]
    pub fn has_operation(&self, op: &str) -> bool {
        match self {
            Self::Minimal => BASIC_OPERATIONS.contains(&op),
            Self::Object | Self::Target(_) => ROOT_OPERATIONS.contains(&op),
        }
    }

    pub const fn is_minimal(&self) -> bool {
        matches!(self, Self::Minimal)
    }
}

#[derive(Debug)]
struct Module {
    name: String,
    methods: MethodTable,
}

/// A generated type under construction.
///
/// Deferred tasks receive this and attach behavior to it; it is sealed into a
/// [`NullClass`] once every task has run.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: Option<String>,
    base: BaseType,
    customizations: MethodTable,
    methods: MethodTable,
    modules: Vec<Module>,
    singleton: bool,
    traceable: bool,
}

impl TypeDescriptor {
    pub(crate) fn new(base: BaseType, name: Option<String>) -> Self {
        let mut methods = MethodTable::new();
        methods.insert("inspect".to_string(), Method::returning(Value::from("<null>")));
        Self {
            name,
            base,
            customizations: MethodTable::new(),
            methods,
            modules: Vec::new(),
            singleton: false,
            traceable: false,
        }
    }

    /// Defines (or redefines) an operation on the type itself.
    pub(crate) fn define(&mut self, name: &str, method: Method) {
        self.methods.insert(name.to_string(), method);
    }

    /// Includes a module. Its methods rank below the type's own.
    pub(crate) fn include(&mut self, name: &str, methods: MethodTable) {
        self.modules.push(Module {
            name: name.to_string(),
            methods,
        });
    }

    /// Installs the override layer, which ranks above everything else.
    pub(crate) fn prepend(&mut self, customizations: MethodTable) {
        self.customizations.extend(customizations);
    }

    pub(crate) fn set_singleton(&mut self) {
        self.singleton = true;
    }

    pub(crate) fn set_traceable(&mut self) {
        self.traceable = true;
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub(crate) fn seal(self, equivalents: EquivalenceSet) -> NullClass {
        NullClass {
            inner: Rc::new(ClassInner {
                id: ClassId::new(),
                name: self.name,
                base: self.base,
                customizations: self.customizations,
                methods: self.methods,
                modules: self.modules,
                singleton: self.singleton.then(OnceCell::new),
                traceable: self.traceable,
                equivalents,
            }),
        }
    }
}

struct ClassInner {
    id: ClassId,
    name: Option<String>,
    base: BaseType,
    customizations: MethodTable,
    methods: MethodTable,
    modules: Vec<Module>,
    singleton: Option<OnceCell<Rc<InstanceState>>>,
    traceable: bool,
    equivalents: EquivalenceSet,
}

/// A generated null type.
///
/// Cheap to clone; clones refer to the same type.
#[derive(Clone)]
pub struct NullClass {
    inner: Rc<ClassInner>,
}

impl NullClass {
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.inner.id
    }

    /// Name given with `NullClassBuilder::named`, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Name, or a placeholder for anonymous types.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.inner.name {
            Some(name) => name.clone(),
            None => format!("#<NullClass:{}>", self.inner.id),
        }
    }

    #[must_use]
    pub fn base(&self) -> &BaseType {
        &self.inner.base
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.inner.singleton.is_some()
    }

    #[must_use]
    pub fn is_traceable(&self) -> bool {
        self.inner.traceable
    }

    /// Constructs an instance, recording the caller when traceable.
    ///
    /// # Errors
    /// `NoMethod("new")` if the type was built with `singleton()`.
    #[track_caller]
    #[allow(clippy::new_ret_no_self)]
    pub fn new(&self) -> NaughtResult<NullObject> {
        self.new_with_caller(&[CallSite::caller()])
    }

    /// Constructs an instance that records the first entry of `callers`.
    ///
    /// An empty list records the immediate caller.
    ///
    /// # Errors
    /// `NoMethod("new")` if the type was built with `singleton()`.
    #[track_caller]
    pub fn new_with_caller(&self, callers: &[CallSite]) -> NaughtResult<NullObject> {
        if self.is_singleton() {
            return Err(NaughtError::no_method("new", self.display_name()));
        }
        let origin = match callers.first() {
            Some(site) => site.clone(),
            None => CallSite::caller(),
        };
        Ok(self.allocate(origin))
    }

    /// The shared instance of a singleton type.
    ///
    /// # Errors
    /// `NoMethod("instance")` if the type was not built with `singleton()`.
    #[track_caller]
    pub fn instance(&self) -> NaughtResult<NullObject> {
        if !self.is_singleton() {
            return Err(NaughtError::no_method("instance", self.display_name()));
        }
        Ok(self.materialize(CallSite::caller()))
    }

    /// Class-level capability query.
    #[must_use]
    pub fn respond_to(&self, op: &str) -> bool {
        match op {
            "new" => !self.is_singleton(),
            "instance" => self.is_singleton(),
            "name" | "ancestors" => true,
            _ => false,
        }
    }

    /// Lookup chain, nearest first.
    #[must_use]
    pub fn ancestors(&self) -> Vec<String> {
        let display = self.display_name();
        let mut chain = vec![format!("{display}::Customizations"), display];
        chain.extend(self.inner.modules.iter().rev().map(|m| m.name.clone()));
        chain.extend(self.inner.base.ancestors());
        chain
    }

    /// Returns true if `name` appears in the lookup chain.
    #[must_use]
    pub fn is_subtype_of(&self, name: &str) -> bool {
        self.ancestors().iter().any(|a| a == name)
    }

    /// The live set of null-equivalent values this type was built with.
    #[must_use]
    pub fn null_equivalents(&self) -> EquivalenceSet {
        self.inner.equivalents.clone()
    }

    /// Classification functions bound to this type.
    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.clone(), self.inner.equivalents.clone())
    }

    /// Instance-level lookup through the override layer, the type and its modules.
    pub(crate) fn lookup(&self, op: &str) -> Option<&Method> {
        let inner = &*self.inner;
        inner
            .customizations
            .get(op)
            .or_else(|| inner.methods.get(op))
            .or_else(|| inner.modules.iter().rev().find_map(|m| m.methods.get(op)))
    }

    /// Produces an instance without going through the public constructor:
    /// the shared one for singletons, a fresh one otherwise.
    pub(crate) fn materialize(&self, site: CallSite) -> NullObject {
        let origin = self.inner.traceable.then_some(site);
        match &self.inner.singleton {
            Some(cell) => {
                let state = cell.get_or_init(|| Rc::new(InstanceState::new(origin)));
                NullObject {
                    class: self.clone(),
                    state: Rc::clone(state),
                }
            }
            None => NullObject {
                class: self.clone(),
                state: Rc::new(InstanceState::new(origin)),
            },
        }
    }

    fn allocate(&self, site: CallSite) -> NullObject {
        NullObject {
            class: self.clone(),
            state: Rc::new(InstanceState::new(self.inner.traceable.then_some(site))),
        }
    }
}

impl PartialEq for NullClass {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for NullClass {}

impl fmt::Debug for NullClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullClass")
            .field("name", &self.display_name())
            .field("base", &self.inner.base)
            .field("singleton", &self.is_singleton())
            .field("traceable", &self.inner.traceable)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for NullClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[derive(Debug)]
struct InstanceState {
    id: ObjectId,
    origin: Option<CallSite>,
}

impl InstanceState {
    fn new(origin: Option<CallSite>) -> Self {
        Self {
            id: ObjectId::new(),
            origin,
        }
    }
}

/// An instance of a generated null type.
///
/// Clones are the same object: equality is identity.
#[derive(Clone)]
pub struct NullObject {
    class: NullClass,
    state: Rc<InstanceState>,
}

impl NullObject {
    /// The generated type this object is an instance of.
    #[must_use]
    pub fn class(&self) -> &NullClass {
        &self.class
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.state.id
    }

    #[must_use]
    pub fn object_id(&self) -> i64 {
        self.state.id.as_i64()
    }

    /// Where the object was created; only recorded for traceable types.
    #[must_use]
    pub fn origin(&self) -> Option<&CallSite> {
        self.state.origin.as_ref()
    }

    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.origin().map(|site| site.file.as_str())
    }

    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.origin().map(|site| site.line)
    }

    /// Returns true if both handles are the same object.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Type check against the generated type's lookup chain.
    #[must_use]
    pub fn is_a(&self, type_name: &str) -> bool {
        self.class.is_subtype_of(type_name)
    }

    /// Invokes an operation.
    ///
    /// # Errors
    /// `NoMethod` if nothing resolves `op` and the type has no
    /// `method_missing`; whatever a caller-defined body returns.
    pub fn send(&self, op: &str, args: &[Value]) -> NaughtResult<Value> {
        if let Some(method) = self.class.lookup(op) {
            return method.call(self, args);
        }
        if let Some(result) = self.intrinsic(op, args) {
            return Ok(result);
        }
        if let Some(fallback) = self.class.lookup(METHOD_MISSING) {
            let mut forwarded = Vec::with_capacity(args.len() + 1);
            forwarded.push(Value::from(op));
            forwarded.extend_from_slice(args);
            return fallback.call(self, &forwarded);
        }
        Err(NaughtError::no_method(op, self.inspect()))
    }

    /// Self-description via the `inspect` operation.
    #[must_use]
    pub fn inspect(&self) -> String {
        match self.class.lookup("inspect").map(|m| m.call(self, &[])) {
            Some(Ok(Value::Str(text))) => text,
            _ => "<null>".to_string(),
        }
    }

    /// Capability query: dispatches `respond_to?` when the object has one,
    /// otherwise checks whether `op` resolves without `method_missing`.
    #[must_use]
    pub fn respond_to(&self, op: &str) -> bool {
        match self.class.lookup("respond_to?") {
            Some(method) => method
                .call(self, &[Value::from(op)])
                .is_ok_and(|v| v.is_truthy()),
            None => self.responds_to_resolved(op),
        }
    }

    pub(crate) fn responds_to_resolved(&self, op: &str) -> bool {
        self.class.lookup(op).is_some() || self.class.base().has_operation(op)
    }

    fn hash_code(&self) -> i64 {
        let digest = blake3::Hasher::new()
            .update(self.class.id().0.as_bytes())
            .update(self.state.id.0.as_bytes())
            .finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest.as_bytes()[..8]);
        i64::from_le_bytes(prefix)
    }

    fn type_arg_matches(&self, arg: Option<&Value>, exact: bool) -> bool {
        match arg {
            Some(Value::Class(class)) => class == &self.class,
            Some(Value::Str(name)) if exact => *name == self.class.display_name(),
            Some(Value::Str(name)) => self.is_a(name),
            _ => false,
        }
    }

    fn intrinsic(&self, op: &str, args: &[Value]) -> Option<Value> {
        if !self.class.base().has_operation(op) {
            return None;
        }
        let this = Value::Null(self.clone());
        let value = match op {
            "==" | "equal?" => Value::Bool(args.first() == Some(&this)),
            "!=" => Value::Bool(args.first() != Some(&this)),
            "!" | "nil?" | "frozen?" => Value::Bool(false),
            "__id__" | "object_id" => Value::Int(self.object_id()),
            "class" => Value::Class(self.class.clone()),
            "hash" => Value::Int(self.hash_code()),
            "to_s" => Value::Str(format!("#<{}>", self.class.display_name())),
            "inspect" => Value::Str(self.inspect()),
            "respond_to?" => Value::Bool(
                args.first()
                    .and_then(Value::as_str)
                    .is_some_and(|name| self.responds_to_resolved(name)),
            ),
            "is_a?" | "kind_of?" => Value::Bool(self.type_arg_matches(args.first(), false)),
            "instance_of?" => Value::Bool(self.type_arg_matches(args.first(), true)),
            _ => return None,
        };
        Some(value)
    }
}

impl PartialEq for NullObject {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for NullObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullObject")
            .field("class", &self.class.display_name())
            .field("id", &self.state.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build, NullClassBuilder};
    use crate::interface::TargetType;

    fn plain() -> NullClass {
        NullClassBuilder::new().generate()
    }

    #[test]
    fn test_instances_are_distinct() {
        let class = plain();
        let a = class.new().unwrap();
        let b = class.new().unwrap();
        assert!(!a.same(&b));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a.object_id(), b.object_id());
    }

    #[test]
    fn test_knows_its_class() {
        let class = plain();
        let null = class.new().unwrap();
        assert_eq!(null.class(), &class);
        assert_eq!(null.send("class", &[]).unwrap(), Value::Class(class.clone()));
    }

    #[test]
    fn test_default_inspect() {
        let null = plain().new().unwrap();
        assert_eq!(null.inspect(), "<null>");
        assert_eq!(Value::Null(null).inspect(), "<null>");
    }

    #[test]
    fn test_equality_operations() {
        let class = plain();
        let a = class.new().unwrap();
        let b = class.new().unwrap();
        let a_val = Value::Null(a.clone());
        assert_eq!(a.send("==", &[a_val.clone()]).unwrap(), Value::Bool(true));
        assert_eq!(b.send("==", &[a_val.clone()]).unwrap(), Value::Bool(false));
        assert_eq!(b.send("!=", &[a_val]).unwrap(), Value::Bool(true));
        assert_eq!(a.send("!", &[]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_untraced_instances_have_no_origin() {
        let null = plain().new().unwrap();
        assert!(null.origin().is_none());
        assert!(null.file().is_none());
    }

    #[test]
    fn test_traced_instance_records_caller() {
        let class = build(|b| {
            b.traceable();
        });
        let null = class.new().unwrap();
        let line = line!() - 1;
        assert_eq!(null.line(), Some(line));
        assert_eq!(null.file(), Some(file!()));
    }

    #[test]
    fn test_explicit_caller_wins() {
        let class = build(|b| {
            b.traceable();
        });
        let site = CallSite::new("lib/somewhere.rs", 42);
        let null = class.new_with_caller(&[site.clone()]).unwrap();
        assert_eq!(null.origin(), Some(&site));
    }

    #[test]
    fn test_empty_caller_list_falls_back() {
        let class = build(|b| {
            b.traceable();
        });
        let null = class.new_with_caller(&[]).unwrap();
        assert_eq!(null.line(), Some(line!() - 1));
    }

    #[test]
    fn test_instance_requires_singleton() {
        let err = plain().instance().unwrap_err();
        assert!(err.is_no_method_for("instance"));
    }

    #[test]
    fn test_anonymous_display_name() {
        let class = plain();
        assert!(class.name().is_none());
        assert!(class.display_name().starts_with("#<NullClass:"));
    }

    #[test]
    fn test_base_type_ancestors() {
        assert_eq!(BaseType::Minimal.ancestors(), vec!["BasicObject"]);
        assert_eq!(BaseType::Object.ancestors(), vec!["Object", "BasicObject"]);
        let point: Rc<dyn Reflect> = Rc::new(TargetType::new("Point"));
        assert_eq!(
            BaseType::Target(point).ancestors(),
            vec!["Point", "Object", "BasicObject"]
        );
    }

    #[test]
    fn test_minimal_base_lacks_root_operations() {
        assert!(BaseType::Minimal.has_operation("=="));
        assert!(!BaseType::Minimal.has_operation("object_id"));
        assert!(BaseType::Object.has_operation("object_id"));
    }

    #[test]
    fn test_hash_is_stable_per_object() {
        let class = build(|b| {
            b.mimic(TargetType::new("Thing"));
        });
        let null = class.new().unwrap();
        let first = null.send("hash", &[]).unwrap();
        assert_eq!(null.send("hash", &[]).unwrap(), first);
        assert!(matches!(first, Value::Int(_)));
    }

    #[test]
    fn test_object_id_is_non_negative() {
        for _ in 0..32 {
            assert!(ObjectId::new().as_i64() >= 0);
        }
    }
}
