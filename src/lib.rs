//! # naught - configurable null object types
//!
//! naught generates types whose instances absorb arbitrary operations instead
//! of failing on a missing value. A builder collects capability directives
//! and assembles them, in registration order, into one generated type; a
//! classifier bound to that type decides whether a runtime value counts as
//! absent.
//!
//! ## Core Concepts
//!
//! - **NullClass**: the generated type; instances are `NullObject`s
//! - **NullClassBuilder**: collects directives (conversions, singleton, black
//!   hole, mimic, impersonate, traceable) and generates the type
//! - **EquivalenceSet**: values treated as absent, `nil` by default
//! - **Classifier**: `null`, `maybe`, `just` and `actual` for one type
//!
//! ## Usage
//!
//! ```rust
//! use naught::{TargetType, Value};
//!
//! let logger = TargetType::new("Logger").operations(["info", "error", "<<"]);
//! let null_logger = naught::build(|b| {
//!     b.named("NullLogger").mimic(logger).black_hole();
//! });
//!
//! let log = null_logger.new()?;
//! assert_eq!(log.send("info", &[Value::from("hello")])?, Value::Null(log.clone()));
//! assert!(log.send("foobar", &[]).unwrap_err().is_no_method());
//! # Ok::<(), naught::NaughtError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod class;
pub mod classify;
pub mod conversions;
pub mod equivalents;
pub mod error;
pub mod interface;
pub mod method;
mod registry;
pub mod value;

pub use builder::{build, BuilderConfig, MimicOptions, NullClassBuilder};
pub use class::{BaseType, CallSite, ClassId, NullClass, NullObject, ObjectId};
pub use classify::Classifier;
pub use equivalents::EquivalenceSet;
pub use error::{NaughtError, NaughtResult};
pub use interface::{Reflect, TargetType};
pub use method::{Method, StubStrategy};
pub use registry::Capability;
pub use value::Value;
