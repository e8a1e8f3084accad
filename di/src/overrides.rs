//! Per-call override instances.

use crate::core::{Erased, TypeKey};
use std::fmt;
use std::sync::Arc;

/// A ready instance that a resolver hands out in place of registry bindings.
///
/// An override answers default-named lookups for its concrete type and for
/// every abstraction declared with [`OverrideBuilder::satisfies`]. The
/// [`satisfies!`](crate::satisfies) macro builds one in a single expression.
#[derive(Clone)]
pub struct Override {
  concrete: TypeKey,
  views: Vec<(TypeKey, Erased)>,
}

impl Override {
  pub fn of<C: Send + Sync + 'static>(instance: Arc<C>) -> OverrideBuilder<C> {
    OverrideBuilder {
      views: vec![(TypeKey::of::<C>(), Erased::new(Arc::clone(&instance)))],
      instance,
    }
  }

  pub fn concrete_type(&self) -> TypeKey {
    self.concrete
  }

  /// Whether this override answers lookups for `key`.
  pub fn satisfies(&self, key: TypeKey) -> bool {
    self.views.iter().any(|(k, _)| *k == key)
  }

  pub(crate) fn view(&self, key: TypeKey) -> Option<Erased> {
    self
      .views
      .iter()
      .find(|(k, _)| *k == key)
      .map(|(_, value)| value.clone())
  }
}

impl fmt::Debug for Override {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let views: Vec<_> = self.views.iter().map(|(k, _)| k.name()).collect();
    f.debug_struct("Override")
      .field("concrete", &self.concrete.name())
      .field("satisfies", &views)
      .finish()
  }
}

/// Declares which abstractions an override instance stands in for.
pub struct OverrideBuilder<C> {
  instance: Arc<C>,
  views: Vec<(TypeKey, Erased)>,
}

impl<C: Send + Sync + 'static> OverrideBuilder<C> {
  /// Adds the abstraction `I`, reached through `cast`, usually an unsizing
  /// coercion: `.satisfies(|c| c as Arc<dyn Database>)`.
  pub fn satisfies<I, F>(mut self, cast: F) -> Self
  where
    I: ?Sized + Send + Sync + 'static,
    F: FnOnce(Arc<C>) -> Arc<I>,
  {
    let view = cast(Arc::clone(&self.instance));
    self.views.push((TypeKey::of::<I>(), Erased::new(view)));
    self
  }

  pub fn build(self) -> Override {
    Override {
      concrete: TypeKey::of::<C>(),
      views: self.views,
    }
  }
}

impl<C: Send + Sync + 'static> From<OverrideBuilder<C>> for Override {
  fn from(builder: OverrideBuilder<C>) -> Self {
    builder.build()
  }
}
