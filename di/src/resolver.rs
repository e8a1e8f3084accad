//! The resolution engine.

use crate::config::{CallConfig, ResolveConfig};
use crate::core::{Binding, Erased, TypeKey, DEFAULT_NAME};
use crate::error::{Error, Result};
use crate::fill::Fill;
use crate::invoke::{assign_returns, Callable, Returns};
use crate::overrides::Override;
use crate::registry::Registry;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Resolves abstractions against an ordered chain of registries.
///
/// The first registry holding a binding wins. A resolver may also carry
/// override instances, added with [`Resolver::with`], which take precedence
/// over every registry for default-named lookups.
///
/// Resolvers are immutable and cheap to clone; clones share the registries.
#[derive(Clone)]
pub struct Resolver {
  registries: Arc<[Registry]>,
  overrides: Arc<[Override]>,
}

impl Resolver {
  pub fn new<I>(registries: I) -> Self
  where
    I: IntoIterator<Item = Registry>,
  {
    Self {
      registries: registries.into_iter().collect(),
      overrides: Arc::from(Vec::new()),
    }
  }

  pub fn registries(&self) -> &[Registry] {
    &self.registries
  }

  /// Returns a resolver over the same registries that also consults
  /// `overrides`, after the overrides this resolver already has.
  ///
  /// ```
  /// use fibre_di::{satisfies, CallConfig, Registry};
  /// use std::sync::Arc;
  ///
  /// trait Database: Send + Sync {}
  /// struct MySql;
  /// impl Database for MySql {}
  ///
  /// let resolver = Registry::new().resolver();
  /// let call = |_db: Arc<dyn Database>| {};
  ///
  /// assert!(resolver.call(call, CallConfig::new()).is_err());
  /// assert!(resolver
  ///   .with([satisfies!(Arc::new(MySql) => dyn Database)])
  ///   .call(call, CallConfig::new())
  ///   .is_ok());
  /// ```
  pub fn with<I, O>(&self, overrides: I) -> Self
  where
    I: IntoIterator<Item = O>,
    O: Into<Override>,
  {
    let overrides = self
      .overrides
      .iter()
      .cloned()
      .chain(overrides.into_iter().map(Into::into))
      .collect();

    Self {
      registries: Arc::clone(&self.registries),
      overrides,
    }
  }

  // --- PUBLIC API ---

  /// Resolves the value bound for `T` under `config.name`.
  pub fn resolve<T>(&self, config: ResolveConfig) -> Result<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    self.resolve_named(&config.name)
  }

  /// Resolves into `receiver`. The receiver is left untouched on failure.
  pub fn resolve_into<T>(&self, receiver: &mut Option<Arc<T>>, config: ResolveConfig) -> Result<()>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    *receiver = Some(self.resolve(config)?);
    Ok(())
  }

  /// Invokes `function` with every parameter resolved, then copies its
  /// returned values into the targets of `config`, if any.
  ///
  /// An error returned by `function` is handed back as is.
  pub fn call<Args, F>(&self, function: F, config: CallConfig<'_>) -> Result<()>
  where
    F: Callable<Args>,
    F::Output: Returns,
  {
    let outputs = function.call_once(self)?.into_returned()?;

    let mut targets = config.returns;
    if targets.is_empty() {
      return Ok(());
    }

    assign_returns(outputs, &mut targets)
  }

  /// Populates `receiver` from the available bindings: the annotated fields
  /// of a struct, or every binding of an element type for `Vec` and `HashMap`
  /// receivers.
  pub fn fill<R>(&self, receiver: &mut R) -> Result<()>
  where
    R: Fill + ?Sized,
  {
    receiver.fill(self)
  }

  // --- ENGINE ---

  /// The argument-resolution procedure shared by every operation.
  pub(crate) fn resolve_named<T>(&self, name: &str) -> Result<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    let key = TypeKey::of::<T>();

    if name == DEFAULT_NAME {
      if let Some(value) = self.overrides.iter().find_map(|o| o.view(key)) {
        tracing::trace!(abstraction = key.name(), "resolved from override");
        return downcast(&value, key, name);
      }
    }

    let binding = self.lookup(key, name)?;
    let value = binding.materialize(self)?;
    downcast(&value, key, name)
  }

  fn lookup(&self, key: TypeKey, name: &str) -> Result<Binding> {
    let found = self
      .registries
      .iter()
      .find_map(|registry| registry.get(key, name));

    match found {
      Some(binding) => Ok(binding),
      None => {
        tracing::trace!(abstraction = key.name(), name, "no binding found");
        Err(Error::not_found(key.name(), name))
      }
    }
  }

  /// Materializes every binding of `T` across the chain, in chain order.
  ///
  /// With `distinct_names`, a name already taken by an earlier registry is
  /// skipped before its binding is materialized.
  pub(crate) fn collect<T>(&self, distinct_names: bool) -> Result<Vec<(String, Arc<T>)>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    let key = TypeKey::of::<T>();
    let mut collected = Vec::new();
    let mut taken = HashSet::new();

    for registry in self.registries.iter() {
      let Some(bindings) = registry.get_all(key) else {
        continue;
      };

      for (name, binding) in bindings {
        if distinct_names && !taken.insert(name.clone()) {
          tracing::trace!(abstraction = key.name(), name = %name, "shadowed by an earlier registry");
          continue;
        }
        let value = binding.materialize(self)?;
        let value = downcast(&value, key, &name)?;
        collected.push((name, value));
      }
    }

    if collected.is_empty() {
      return Err(Error::none_found(key.name()));
    }

    Ok(collected)
  }
}

fn downcast<T: ?Sized + 'static>(value: &Erased, key: TypeKey, name: &str) -> Result<Arc<T>> {
  value
    .downcast::<T>()
    .ok_or_else(|| Error::not_found(key.name(), name))
}

impl fmt::Debug for Resolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Resolver")
      .field("registries", &self.registries)
      .field("overrides", &self.overrides)
      .finish()
  }
}
