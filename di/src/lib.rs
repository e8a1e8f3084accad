//! # Fibre DI
//!
//! A thread-safe dependency-binding registry and resolution engine.
//!
//! Bindings associate an abstraction type, usually a `dyn Trait`, and a name
//! with either a ready instance or a constructor. A [`Resolver`] walks an
//! ordered chain of registries to materialize values, invoke functions with
//! every parameter resolved, and fill structs, sequences and maps.
//!
//! ## Core Concepts
//!
//! - **Registry**: stores bindings. Singletons are constructed when bound,
//!   factories on every resolution.
//! - **Resolver**: resolves against one or more registries, optionally with
//!   per-call override instances.
//! - **Constructors**: plain closures or functions whose `Arc<T>` parameters
//!   are resolved from bindings. They return `Arc<T>`, [`Managed<T>`],
//!   tuples of those, or a `Result` around any of them.
//! - **Global resolver**: [`install`] one at startup and use [`resolve!`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_di::{BindConfig, CallConfig, Registry, ResolveConfig};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   message: Arc<String>,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.to_string()
//!   }
//! }
//!
//! let registry = Registry::new();
//! registry
//!   .bind_singleton(|| Arc::new(String::from("Hello, World!")), BindConfig::new())
//!   .unwrap();
//!
//! // Constructor parameters are resolved from earlier bindings.
//! registry
//!   .bind_factory(
//!     |message: Arc<String>| Arc::new(EnglishGreeter { message }) as Arc<dyn Greeter>,
//!     BindConfig::new(),
//!   )
//!   .unwrap();
//!
//! let resolver = registry.resolver();
//! let greeter = resolver.resolve::<dyn Greeter>(ResolveConfig::default()).unwrap();
//! assert_eq!(greeter.greet(), "Hello, World!");
//!
//! let mut greeting: Option<String> = None;
//! resolver
//!   .call(
//!     |greeter: Arc<dyn Greeter>| (greeter.greet(),),
//!     CallConfig::new().returning(&mut greeting),
//!   )
//!   .unwrap();
//! assert_eq!(greeting.as_deref(), Some("Hello, World!"));
//! ```

mod config;
mod core;
mod error;
mod fill;
mod global;
mod invoke;
mod macros;
mod output;
mod overrides;
mod registry;
mod resolver;

pub use crate::core::{Binding, TypeKey, DEFAULT_NAME};
pub use config::{BindConfig, CallConfig, ResolveConfig};
pub use error::{BoxError, Error, Result};
pub use fill::{Field, Fill, Lookup, Tag};
pub use global::{global, install, uninstall};
pub use invoke::{Callable, Inject, Invoke, ReturnTarget, Returns};
pub use output::{Managed, Output, Outputs, PostConstruct};
pub use overrides::{Override, OverrideBuilder};
pub use registry::Registry;
pub use resolver::Resolver;

#[doc(hidden)]
pub mod __private {
  pub use crate::fill::{apply, plan, FieldPlan};
}
