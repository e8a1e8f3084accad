//! Constructor return shapes and the capabilities carried by produced values.
//!
//! A constructor returns its useful values as `Arc<T>` (no capabilities) or
//! as [`Managed<T>`], which remembers what the concrete value can do after
//! construction: be filled, run a post-construction hook. Several values are
//! returned as a tuple, and any shape may be wrapped in a `Result` whose error
//! aborts the construction.

use crate::core::{Erased, TypeKey};
use crate::error::{BoxError, Error, Result};
use crate::fill::Fill;
use crate::resolver::Resolver;
use std::sync::Arc;

/// The post-construction hook.
///
/// Runs right after a [`Managed::hooked`] value is materialized: once for
/// singletons, at bind time, and on every resolution for factories. The hook
/// receives the resolver that produced the value and resolves whatever else
/// it needs through it.
pub trait PostConstruct {
  fn post_construct(&self, resolver: &Resolver) -> Result<()>;
}

type Finish<T> = Box<dyn FnOnce(&Resolver, bool) -> Result<Arc<T>> + Send>;

/// A constructed value together with its post-construction steps.
///
/// ```
/// use fibre_di::{BindConfig, Managed, Registry};
/// use std::sync::Arc;
///
/// trait Shape: Send + Sync {
///   fn area(&self) -> i32;
/// }
///
/// struct Circle;
/// impl Shape for Circle {
///   fn area(&self) -> i32 {
///     100500
///   }
/// }
///
/// let registry = Registry::new();
/// registry
///   .bind_singleton(
///     || Managed::new(Circle).map(|circle| circle as Arc<dyn Shape>),
///     BindConfig::new(),
///   )
///   .unwrap();
/// ```
pub struct Managed<T: ?Sized> {
  finish: Finish<T>,
}

impl<C: Send + Sync + 'static> Managed<C> {
  /// Wraps a value without a fill capability. Binding it with the fill flag
  /// fails with [`Error::InvalidReceiver`].
  pub fn new(value: C) -> Self {
    Self {
      finish: Box::new(move |_, fill| {
        if fill {
          return Err(Error::not_fillable(std::any::type_name::<C>()));
        }
        Ok(Arc::new(value))
      }),
    }
  }

  /// Wraps a value that is filled through [`Fill`] when its binding was
  /// created with the fill flag.
  pub fn fillable(value: C) -> Self
  where
    C: Fill,
  {
    Self {
      finish: Box::new(move |resolver, fill| {
        let mut value = value;
        if fill {
          value.fill(resolver)?;
        }
        Ok(Arc::new(value))
      }),
    }
  }
}

impl<T: ?Sized + Send + Sync + 'static> Managed<T> {
  /// Runs the value's [`PostConstruct`] hook after any fill.
  pub fn hooked(self) -> Self
  where
    T: PostConstruct,
  {
    let finish = self.finish;
    Self {
      finish: Box::new(move |resolver, fill| {
        let value = finish(resolver, fill)?;
        value.post_construct(resolver)?;
        Ok(value)
      }),
    }
  }

  /// Converts the handed out value, usually to the abstraction it is bound
  /// as: `.map(|circle| circle as Arc<dyn Shape>)`.
  pub fn map<I, F>(self, cast: F) -> Managed<I>
  where
    I: ?Sized + Send + Sync + 'static,
    F: FnOnce(Arc<T>) -> Arc<I> + Send + 'static,
  {
    let finish = self.finish;
    Managed {
      finish: Box::new(move |resolver, fill| finish(resolver, fill).map(cast)),
    }
  }
}

enum Stage {
  Ready(Erased),
  Pending(Box<dyn FnOnce(&Resolver, bool) -> Result<Erased> + Send>),
}

/// A single value produced by a constructor.
#[doc(hidden)]
pub struct Produced {
  key: TypeKey,
  stage: Stage,
}

impl Produced {
  pub(crate) fn key(&self) -> TypeKey {
    self.key
  }

  /// Runs the pending post-construction steps, if any. A plain `Arc` has
  /// nothing to fill, so the fill flag is an error for it.
  pub(crate) fn finish(self, resolver: &Resolver, fill: bool) -> Result<Erased> {
    match self.stage {
      Stage::Ready(_) if fill => Err(Error::not_fillable(self.key.name())),
      Stage::Ready(value) => Ok(value),
      Stage::Pending(finish) => finish(resolver, fill),
    }
  }
}

/// One useful value of a constructor's return.
pub trait Output {
  #[doc(hidden)]
  fn key() -> TypeKey;
  #[doc(hidden)]
  fn into_produced(self) -> Produced;
}

impl<T: ?Sized + Send + Sync + 'static> Output for Arc<T> {
  fn key() -> TypeKey {
    TypeKey::of::<T>()
  }

  fn into_produced(self) -> Produced {
    Produced {
      key: TypeKey::of::<T>(),
      stage: Stage::Ready(Erased::new(self)),
    }
  }
}

impl<T: ?Sized + Send + Sync + 'static> Output for Managed<T> {
  fn key() -> TypeKey {
    TypeKey::of::<T>()
  }

  fn into_produced(self) -> Produced {
    let finish = self.finish;
    Produced {
      key: TypeKey::of::<T>(),
      stage: Stage::Pending(Box::new(move |resolver, fill| {
        finish(resolver, fill).map(Erased::new)
      })),
    }
  }
}

/// The complete return shape of a constructor.
///
/// Implemented for `()`, single outputs, tuples of up to six outputs, and a
/// `Result` around any of these. The error of a `Result` is never a useful
/// value.
pub trait Outputs {
  /// Abstraction types of the useful values, in return order.
  #[doc(hidden)]
  fn keys() -> Vec<TypeKey>;
  #[doc(hidden)]
  fn into_produced(self) -> Result<Vec<Produced>>;
}

impl Outputs for () {
  fn keys() -> Vec<TypeKey> {
    Vec::new()
  }

  fn into_produced(self) -> Result<Vec<Produced>> {
    Ok(Vec::new())
  }
}

impl<T: ?Sized + Send + Sync + 'static> Outputs for Arc<T> {
  fn keys() -> Vec<TypeKey> {
    vec![<Self as Output>::key()]
  }

  fn into_produced(self) -> Result<Vec<Produced>> {
    Ok(vec![Output::into_produced(self)])
  }
}

impl<T: ?Sized + Send + Sync + 'static> Outputs for Managed<T> {
  fn keys() -> Vec<TypeKey> {
    vec![<Self as Output>::key()]
  }

  fn into_produced(self) -> Result<Vec<Produced>> {
    Ok(vec![Output::into_produced(self)])
  }
}

impl<O: Outputs, E: Into<BoxError>> Outputs for Result<O, E> {
  fn keys() -> Vec<TypeKey> {
    O::keys()
  }

  fn into_produced(self) -> Result<Vec<Produced>> {
    Outputs::into_produced(self.map_err(Error::construction)?)
  }
}

macro_rules! impl_outputs_for_tuples {
  ($($out:ident),+) => {
    impl<$($out: Output,)+> Outputs for ($($out,)+) {
      fn keys() -> Vec<TypeKey> {
        vec![$($out::key(),)+]
      }

      #[allow(non_snake_case)]
      fn into_produced(self) -> Result<Vec<Produced>> {
        let ($($out,)+) = self;
        Ok(vec![$(Output::into_produced($out),)+])
      }
    }
  };
}

impl_outputs_for_tuples!(O1);
impl_outputs_for_tuples!(O1, O2);
impl_outputs_for_tuples!(O1, O2, O3);
impl_outputs_for_tuples!(O1, O2, O3, O4);
impl_outputs_for_tuples!(O1, O2, O3, O4, O5);
impl_outputs_for_tuples!(O1, O2, O3, O4, O5, O6);
