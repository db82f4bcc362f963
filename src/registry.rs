//! Capability registry: deferred construction steps.
//!
//! Directives do not touch the type directly. Each one appends a task that
//! mutates the type descriptor at finalization; tasks run once, in the order
//! they were registered.

use std::fmt;

use crate::builder::BuilderConfig;
use crate::class::TypeDescriptor;

/// Capability a deferred task installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ExplicitConversions,
    ImplicitConversions,
    Singleton,
    Mimic,
    Traceable,
    /// Universal fallback: answer every operation with a stub.
    RespondToAnything,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitConversions => write!(f, "explicit_conversions"),
            Self::ImplicitConversions => write!(f, "implicit_conversions"),
            Self::Singleton => write!(f, "singleton"),
            Self::Mimic => write!(f, "mimic"),
            Self::Traceable => write!(f, "traceable"),
            Self::RespondToAnything => write!(f, "respond_to_anything"),
        }
    }
}

type TaskFn = dyn FnOnce(&mut TypeDescriptor, &BuilderConfig);

struct Task {
    capability: Capability,
    run: Box<TaskFn>,
}

/// Ordered, append-only list of deferred tasks.
#[derive(Default)]
pub struct CapabilityRegistry {
    tasks: Vec<Task>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task.
    pub fn defer<F>(&mut self, capability: Capability, task: F)
    where
        F: FnOnce(&mut TypeDescriptor, &BuilderConfig) + 'static,
    {
        self.tasks.push(Task {
            capability,
            run: Box::new(task),
        });
    }

    /// Registered capabilities in registration order.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        self.tasks.iter().map(|t| t.capability).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs every task against `descriptor`, consuming the registry.
    ///
    /// `config` is the builder configuration as it stands at finalization, so
    /// a task reads the stub strategy in effect when it attaches, not when it
    /// was registered.
    pub fn drain(self, descriptor: &mut TypeDescriptor, config: &BuilderConfig) {
        for (index, task) in self.tasks.into_iter().enumerate() {
            tracing::trace!(index, capability = %task.capability, "running deferred task");
            (task.run)(descriptor, config);
        }
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.capabilities()).finish()
    }
}
