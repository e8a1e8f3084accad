//! The `Registry` and its bind operations.

use crate::config::BindConfig;
use crate::core::{Binding, Erased, FactoryFn, TypeKey};
use crate::error::{Error, Result};
use crate::invoke::{Callable, Invoke};
use crate::output::Outputs;
use crate::resolver::Resolver;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

type Bindings = HashMap<TypeKey, BTreeMap<String, Binding>>;

/// A thread-safe store of bindings, indexed by abstraction type and name.
///
/// `Registry` is a handle: clones share the same bindings. Lookups take a
/// shared lock; binding and resetting take an exclusive lock, and only for the
/// final store. Constructors run without any lock held, so a singleton
/// constructor may depend on bindings made earlier in the same registry.
#[derive(Clone, Default)]
pub struct Registry {
  bindings: Arc<RwLock<Bindings>>,
}

impl Registry {
  /// Creates a new, empty `Registry`.
  pub fn new() -> Self {
    Self::default()
  }

  /// A resolver over this registry alone.
  pub fn resolver(&self) -> Resolver {
    Resolver::new([self.clone()])
  }

  // --- PRIVATE HELPERS ---

  fn store(&self, entries: Vec<(TypeKey, String, Binding)>) {
    let mut bindings = self.bindings.write();
    for (key, name, binding) in entries {
      bindings.entry(key).or_default().insert(name, binding);
    }
  }

  // --- Binding ---

  /// Invokes `constructor` now and binds every value it returns as a
  /// singleton.
  ///
  /// The constructor's parameters are resolved from this registry. With
  /// several returned values, `config.names` may hold no name (all values
  /// under the default name), one name (used for every value) or one name
  /// per value. A single returned value is bound under every given name.
  /// Nothing is stored when the constructor, a fill or a hook fails.
  #[track_caller]
  pub fn bind_singleton<Args, C>(&self, constructor: C, config: BindConfig) -> Result<()>
  where
    C: Callable<Args>,
    C::Output: Outputs,
  {
    let caller = Location::caller();
    let keys = <C::Output as Outputs>::keys();
    if keys.is_empty() {
      return Err(Error::NoUsefulReturn);
    }
    if keys.len() > 1 && config.names.len() > 1 && config.names.len() != keys.len() {
      return Err(Error::NameCountMismatch {
        values: keys.len(),
        names: config.names.len(),
      });
    }

    let resolver = self.resolver();
    let produced = constructor.call_once(&resolver)?.into_produced()?;

    let mut values = Vec::with_capacity(produced.len());
    for value in produced {
      let key = value.key();
      values.push((key, value.finish(&resolver, config.fill)?));
    }

    let names = config.effective_names();
    let single = values.len() == 1;
    let mut entries = Vec::new();
    for (index, (key, value)) in values.into_iter().enumerate() {
      if single {
        for name in &names {
          entries.push((key, name.clone(), Binding::instance(value.clone(), config.fill, Some(caller))));
        }
        continue;
      }
      let name = if names.len() > 1 { &names[index] } else { &names[0] };
      entries.push((key, name.clone(), Binding::instance(value, config.fill, Some(caller))));
    }

    tracing::debug!(
      abstractions = ?keys.iter().map(TypeKey::name).collect::<Vec<_>>(),
      names = ?names,
      "bound singleton"
    );
    self.store(entries);
    Ok(())
  }

  /// Binds `constructor` as a factory: it is invoked anew, through the
  /// resolving resolver, on every resolution.
  ///
  /// The constructor must return exactly one value and optionally an error.
  /// The binding is stored under every given name.
  #[track_caller]
  pub fn bind_factory<Args, C>(&self, constructor: C, config: BindConfig) -> Result<()>
  where
    C: Invoke<Args>,
    C::Output: Outputs,
  {
    let caller = Location::caller();
    let keys = <C::Output as Outputs>::keys();
    let key = match keys.as_slice() {
      [] => return Err(Error::NoUsefulReturn),
      [key] => *key,
      _ => return Err(Error::FactoryArity { found: keys.len() }),
    };

    let factory: FactoryFn = Arc::new(move |resolver: &Resolver| {
      constructor
        .invoke(resolver)?
        .into_produced()?
        .pop()
        .ok_or(Error::NoUsefulReturn)
    });

    let names = config.effective_names();
    let entries = names
      .iter()
      .map(|name| {
        let binding = Binding::factory(Arc::clone(&factory), config.fill, Some(caller));
        (key, name.clone(), binding)
      })
      .collect();

    tracing::debug!(abstraction = key.name(), names = ?names, "bound factory");
    self.store(entries);
    Ok(())
  }

  /// Binds a ready instance under its own concrete type `C`, not under any
  /// abstraction it implements.
  #[track_caller]
  pub fn bind_implementation<C>(&self, instance: Arc<C>, config: BindConfig) -> Result<()>
  where
    C: Send + Sync + 'static,
  {
    let caller = Location::caller();
    let key = TypeKey::of::<C>();
    let value = Erased::new(instance);

    let names = config.effective_names();
    let entries = names
      .iter()
      .map(|name| (key, name.clone(), Binding::instance(value.clone(), false, Some(caller))))
      .collect();

    tracing::debug!(implementation = key.name(), names = ?names, "bound implementation");
    self.store(entries);
    Ok(())
  }

  // --- Lookup ---

  pub fn lookup(&self, key: TypeKey, name: &str) -> Result<Binding> {
    self.get(key, name).ok_or_else(|| Error::not_found(key.name(), name))
  }

  /// Every binding of `key`, by name.
  pub fn lookup_all(&self, key: TypeKey) -> Result<BTreeMap<String, Binding>> {
    self.get_all(key).ok_or_else(|| Error::none_found(key.name()))
  }

  pub(crate) fn get(&self, key: TypeKey, name: &str) -> Option<Binding> {
    self.bindings.read().get(&key)?.get(name).cloned()
  }

  pub(crate) fn get_all(&self, key: TypeKey) -> Option<BTreeMap<String, Binding>> {
    self
      .bindings
      .read()
      .get(&key)
      .filter(|named| !named.is_empty())
      .cloned()
  }

  /// Number of distinct abstraction types bound.
  pub fn len(&self) -> usize {
    self.bindings.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.read().is_empty()
  }

  /// Removes every binding.
  pub fn reset(&self) {
    let mut bindings = self.bindings.write();
    let cleared = bindings.len();
    bindings.clear();
    tracing::debug!(cleared, "registry reset");
  }
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bindings = self.bindings.read();
    let mut map = f.debug_map();
    for (key, named) in bindings.iter() {
      map.entry(&key.name(), named);
    }
    map.finish()
  }
}
