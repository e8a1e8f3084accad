//! Core data structures shared by the registry and the resolver.

use crate::error::Result;
use crate::output::Produced;
use crate::resolver::Resolver;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::Location;
use std::sync::Arc;

/// The name used by bindings and lookups that do not specify one.
pub const DEFAULT_NAME: &str = "default";

/// Identifies an abstraction type.
///
/// Keys are captured from a generic parameter, so `TypeKey::of::<dyn Shape>()`
/// and `TypeKey::of::<Circle>()` are different keys even when `Circle`
/// implements `Shape`. Equality only looks at the `TypeId`; the type name is
/// kept for messages and diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// A type-erased `Arc<T>`. Cloning it clones the inner `Arc`, so every clone
/// hands out the same underlying value.
#[derive(Clone)]
pub(crate) struct Erased(Arc<dyn Any + Send + Sync>);

impl Erased {
  pub(crate) fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
    Self(Arc::new(value))
  }

  pub(crate) fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
    self.0.downcast_ref::<Arc<T>>().cloned()
  }
}

pub(crate) type FactoryFn = Arc<dyn Fn(&Resolver) -> Result<Produced> + Send + Sync>;

#[derive(Clone)]
enum BindingKind {
  Instance(Erased),
  Factory(FactoryFn),
}

/// A stored association of an abstraction type and name to either a ready
/// instance or a deferred constructor.
#[derive(Clone)]
pub struct Binding {
  kind: BindingKind,
  fill: bool,
  caller: Option<&'static Location<'static>>,
}

impl Binding {
  pub(crate) fn instance(
    value: Erased,
    fill: bool,
    caller: Option<&'static Location<'static>>,
  ) -> Self {
    Self {
      kind: BindingKind::Instance(value),
      fill,
      caller,
    }
  }

  pub(crate) fn factory(
    factory: FactoryFn,
    fill: bool,
    caller: Option<&'static Location<'static>>,
  ) -> Self {
    Self {
      kind: BindingKind::Factory(factory),
      fill,
      caller,
    }
  }

  pub fn is_instance(&self) -> bool {
    matches!(self.kind, BindingKind::Instance(_))
  }

  pub fn is_factory(&self) -> bool {
    matches!(self.kind, BindingKind::Factory(_))
  }

  /// Whether produced values are filled after construction.
  pub fn fill(&self) -> bool {
    self.fill
  }

  /// Where the bind call that created this binding was made.
  pub fn caller(&self) -> Option<&'static Location<'static>> {
    self.caller
  }

  /// Produces the bound value. Instances are handed out unchanged; factories
  /// are invoked through `resolver` and run their post-construction steps on
  /// every call.
  pub(crate) fn materialize(&self, resolver: &Resolver) -> Result<Erased> {
    match &self.kind {
      BindingKind::Instance(value) => Ok(value.clone()),
      BindingKind::Factory(factory) => {
        let produced = factory(resolver)?;
        tracing::trace!(abstraction = produced.key().name(), "materialized factory binding");
        produced.finish(resolver, self.fill)
      }
    }
  }
}

impl fmt::Debug for Binding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let kind = match self.kind {
      BindingKind::Instance(_) => "instance",
      BindingKind::Factory(_) => "factory",
    };
    let mut s = f.debug_struct("Binding");
    s.field("kind", &kind).field("fill", &self.fill);
    if let Some(caller) = self.caller {
      s.field("caller", &format_args!("{}:{}", caller.file(), caller.line()));
    }
    s.finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  trait Shape {}
  struct Circle;
  impl Shape for Circle {}

  #[test]
  fn keys_compare_by_type_only() {
    assert_eq!(TypeKey::of::<dyn Shape>(), TypeKey::of::<dyn Shape>());
    assert_ne!(TypeKey::of::<dyn Shape>(), TypeKey::of::<Circle>());
    assert!(TypeKey::of::<Circle>().name().ends_with("Circle"));
  }

  #[test]
  fn erased_values_keep_identity() {
    let value: Arc<dyn Shape + Send + Sync> = Arc::new(Circle);
    let erased = Erased::new(Arc::clone(&value));
    let copy = erased.clone();

    let a = erased.downcast::<dyn Shape + Send + Sync>().unwrap();
    let b = copy.downcast::<dyn Shape + Send + Sync>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &value));
    assert!(erased.downcast::<Circle>().is_none());
  }
}
