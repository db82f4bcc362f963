//! Null class builder.
//!
//! `NullClassBuilder` collects capability directives and assembles them into
//! one [`NullClass`]. Directives that shape the type are deferred into the
//! capability registry and replayed in registration order by
//! [`NullClassBuilder::generate`]; the stub strategy and base type are plain
//! configuration and are read when the tasks run.

use std::rc::Rc;

use crate::class::{BaseType, NullClass, NullObject, TypeDescriptor, METHOD_MISSING};
use crate::conversions::{
    explicit_zero_values, implicit_zero_values, method_table, EXPLICIT_MODULE, IMPLICIT_MODULE,
};
use crate::equivalents::EquivalenceSet;
use crate::error::NaughtResult;
use crate::interface::{is_root_operation, Reflect};
use crate::method::{Method, MethodTable, StubStrategy};
use crate::registry::{Capability, CapabilityRegistry};
use crate::value::Value;

/// Builds a null class, letting `customize` configure the builder first.
///
/// # Example
/// ```
/// use naught::Value;
///
/// let null_class = naught::build(|b| {
///     b.black_hole();
/// });
/// let null = null_class.new().unwrap();
///
/// assert_eq!(null.send("foobar", &[]).unwrap(), Value::Null(null.clone()));
/// ```
pub fn build<F>(customize: F) -> NullClass
where
    F: FnOnce(&mut NullClassBuilder),
{
    let mut builder = NullClassBuilder::new();
    builder.customize(customize);
    builder.generate()
}

/// Scalar builder state not expressed as deferred tasks.
#[derive(Debug, Clone, Default)]
pub struct BuilderConfig {
    /// Base the generated type starts from.
    pub base: BaseType,
    /// Set by mimicry; suppresses the universal fallback.
    pub interface_defined: bool,
    /// Return behavior of every generated stub.
    pub stub_strategy: StubStrategy,
    /// Optional type name.
    pub name: Option<String>,
}

/// Options for `mimic_with` / `impersonate_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimicOptions {
    /// Also stub operations the target inherits.
    pub include_super: bool,
}

impl Default for MimicOptions {
    fn default() -> Self {
        Self {
            include_super: true,
        }
    }
}

/// Accumulates capability directives for one generated type.
#[derive(Debug, Default)]
pub struct NullClassBuilder {
    config: BuilderConfig,
    registry: CapabilityRegistry,
    equivalents: EquivalenceSet,
    customizations: MethodTable,
}

impl NullClassBuilder {
    /// Creates a builder with no capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a configuration procedure against this builder.
    pub fn customize<F>(&mut self, customize: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        customize(self);
        self
    }

    /// Names the generated type.
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.config.name = Some(name.into());
        self
    }

    /// Adds zero-value answers to `to_s`, `to_a`, `to_i`, `to_f`, `to_c`,
    /// `to_r` and `to_h`.
    pub fn define_explicit_conversions(&mut self) -> &mut Self {
        self.registry.defer(Capability::ExplicitConversions, |ty, _| {
            ty.include(EXPLICIT_MODULE, method_table(explicit_zero_values()));
        });
        self
    }

    /// Adds zero-value answers to `to_ary` and `to_str`.
    pub fn define_implicit_conversions(&mut self) -> &mut Self {
        self.registry.defer(Capability::ImplicitConversions, |ty, _| {
            ty.include(IMPLICIT_MODULE, method_table(implicit_zero_values()));
        });
        self
    }

    /// Restricts the type to one shared instance reachable through
    /// `NullClass::instance`; `new` is disabled.
    pub fn singleton(&mut self) -> &mut Self {
        self.registry
            .defer(Capability::Singleton, |ty, _| ty.set_singleton());
        self
    }

    /// Makes every stub return the receiver.
    ///
    /// This is configuration, not a deferred task: it applies to every stub
    /// attached at finalization, whether it was declared before or after
    /// `mimic`.
    pub fn black_hole(&mut self) -> &mut Self {
        self.config.stub_strategy = StubStrategy::ReturnsSelf;
        self
    }

    /// Stubs every operation of `target`, inherited ones included.
    pub fn mimic<R>(&mut self, target: R) -> &mut Self
    where
        R: Reflect + 'static,
    {
        self.mimic_with(target, MimicOptions::default())
    }

    /// Stubs the operations of `target`; only the interface of `target`
    /// resolves on instances.
    pub fn mimic_with<R>(&mut self, target: R, options: MimicOptions) -> &mut Self
    where
        R: Reflect + 'static,
    {
        let target: Rc<dyn Reflect> = Rc::new(target);
        self.defer_mimic(target, options)
    }

    /// Mimics `target` and adopts it as the base, so type checks against it
    /// succeed.
    pub fn impersonate<R>(&mut self, target: R) -> &mut Self
    where
        R: Reflect + 'static,
    {
        self.impersonate_with(target, MimicOptions::default())
    }

    /// `impersonate` with explicit options.
    pub fn impersonate_with<R>(&mut self, target: R, options: MimicOptions) -> &mut Self
    where
        R: Reflect + 'static,
    {
        let target: Rc<dyn Reflect> = Rc::new(target);
        self.defer_mimic(Rc::clone(&target), options);
        self.config.base = BaseType::Target(target);
        self
    }

    /// Records where each instance was created, readable as `__file__` and
    /// `__line__`.
    pub fn traceable(&mut self) -> &mut Self {
        self.registry.defer(Capability::Traceable, |ty, _| {
            ty.set_traceable();
            ty.define(
                "__file__",
                Method::new(|receiver, _| Ok(Value::from(receiver.file()))),
            );
            ty.define(
                "__line__",
                Method::new(|receiver, _| Ok(Value::from(receiver.line().map(i64::from)))),
            );
        });
        self
    }

    /// The live set of values treated as absent.
    ///
    /// The handle shares storage with the finished type and its classifier.
    pub fn null_equivalents(&self) -> &EquivalenceSet {
        &self.equivalents
    }

    /// Defines a method in the override layer. It wins over every generated
    /// stub, regardless of directive order.
    pub fn define_method<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&NullObject, &[Value]) -> NaughtResult<Value> + 'static,
    {
        self.customizations.insert(name.into(), Method::new(body));
        self
    }

    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Registered capabilities, in registration order.
    #[must_use]
    pub fn pending(&self) -> Vec<Capability> {
        self.registry.capabilities()
    }

    /// Finalizes the builder into a generated type.
    pub fn generate(self) -> NullClass {
        let Self {
            config,
            mut registry,
            equivalents,
            customizations,
        } = self;

        let mut descriptor = TypeDescriptor::new(config.base.clone(), config.name.clone());
        descriptor.prepend(customizations);

        if !config.interface_defined {
            registry.defer(Capability::RespondToAnything, |ty, config| {
                ty.define(METHOD_MISSING, config.stub_strategy.stub());
                ty.define("respond_to?", Method::returning(Value::Bool(true)));
            });
        }

        tracing::debug!(
            name = ?config.name,
            tasks = registry.len(),
            interface = if config.interface_defined { "closed" } else { "open" },
            strategy = %config.stub_strategy,
            "generating null class"
        );

        registry.drain(&mut descriptor, &config);
        descriptor.seal(equivalents)
    }

    fn defer_mimic(&mut self, target: Rc<dyn Reflect>, options: MimicOptions) -> &mut Self {
        self.config.base = BaseType::Object;
        self.config.interface_defined = true;

        self.registry.defer(Capability::Mimic, move |ty, config| {
            let names = target.operation_names(options.include_super);
            for name in names.iter().filter(|name| !is_root_operation(name)) {
                tracing::trace!(
                    operation = %name,
                    target = target.type_name(),
                    strategy = %config.stub_strategy,
                    "stubbing mimicked operation"
                );
                ty.define(name, config.stub_strategy.stub());
            }
            let description = format!("<null:{}>", target.type_name());
            ty.define("inspect", Method::returning(Value::from(description)));
        });
        self
    }
}
