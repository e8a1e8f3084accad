//! Argument wiring: resolving a function's parameters from bindings and
//! collecting what it returns.

use crate::core::DEFAULT_NAME;
use crate::error::{BoxError, Error, Result};
use crate::resolver::Resolver;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A parameter type the resolver can supply.
///
/// `Arc<T>` parameters are resolved by their abstraction type `T` under the
/// default name, so overrides added with `Resolver::with` apply to them.
pub trait Inject: Sized {
  fn inject(resolver: &Resolver) -> Result<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Inject for Arc<T> {
  fn inject(resolver: &Resolver) -> Result<Self> {
    resolver.resolve_named::<T>(DEFAULT_NAME)
  }
}

/// A function that can be stored in a registry and invoked repeatedly, with
/// every parameter resolved from bindings.
pub trait Invoke<Args>: Send + Sync + 'static {
  type Output;

  fn invoke(&self, resolver: &Resolver) -> Result<Self::Output>;
}

/// A function invoked once with every parameter resolved from bindings.
pub trait Callable<Args> {
  type Output;

  fn call_once(self, resolver: &Resolver) -> Result<Self::Output>;
}

macro_rules! impl_invoke {
  ($($arg:ident),*) => {
    impl<F, R, $($arg,)*> Invoke<($($arg,)*)> for F
    where
      F: Fn($($arg),*) -> R + Send + Sync + 'static,
      $($arg: Inject,)*
    {
      type Output = R;

      #[allow(non_snake_case, unused_variables)]
      fn invoke(&self, resolver: &Resolver) -> Result<R> {
        $(let $arg = $arg::inject(resolver)?;)*
        Ok(self($($arg),*))
      }
    }

    impl<F, R, $($arg,)*> Callable<($($arg,)*)> for F
    where
      F: FnOnce($($arg),*) -> R,
      $($arg: Inject,)*
    {
      type Output = R;

      #[allow(non_snake_case, unused_variables)]
      fn call_once(self, resolver: &Resolver) -> Result<R> {
        $(let $arg = $arg::inject(resolver)?;)*
        Ok(self($($arg),*))
      }
    }
  };
}

impl_invoke!();
impl_invoke!(A1);
impl_invoke!(A1, A2);
impl_invoke!(A1, A2, A3);
impl_invoke!(A1, A2, A3, A4);
impl_invoke!(A1, A2, A3, A4, A5);
impl_invoke!(A1, A2, A3, A4, A5, A6);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8);

/// A single value returned from a called function.
#[doc(hidden)]
pub struct Returned {
  type_id: TypeId,
  type_name: &'static str,
  value: Box<dyn Any>,
}

impl Returned {
  fn new<T: 'static>(value: T) -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
      value: Box::new(value),
    }
  }
}

impl fmt::Debug for Returned {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Returned").field(&self.type_name).finish()
  }
}

/// The return shape of a function passed to `Resolver::call`.
///
/// Implemented for `()`, `Arc<T>`, tuples of up to six values, and a `Result`
/// around any of these whose error is handed back to the caller.
pub trait Returns {
  #[doc(hidden)]
  fn into_returned(self) -> Result<Vec<Returned>>;
}

impl Returns for () {
  fn into_returned(self) -> Result<Vec<Returned>> {
    Ok(Vec::new())
  }
}

impl<T: ?Sized + 'static> Returns for Arc<T> {
  fn into_returned(self) -> Result<Vec<Returned>> {
    Ok(vec![Returned::new(self)])
  }
}

impl<R: Returns, E: Into<BoxError>> Returns for Result<R, E> {
  fn into_returned(self) -> Result<Vec<Returned>> {
    self.map_err(Error::construction)?.into_returned()
  }
}

macro_rules! impl_returns_for_tuples {
  ($($ret:ident),+) => {
    impl<$($ret: 'static,)+> Returns for ($($ret,)+) {
      #[allow(non_snake_case)]
      fn into_returned(self) -> Result<Vec<Returned>> {
        let ($($ret,)+) = self;
        Ok(vec![$(Returned::new($ret),)+])
      }
    }
  };
}

impl_returns_for_tuples!(R1);
impl_returns_for_tuples!(R1, R2);
impl_returns_for_tuples!(R1, R2, R3);
impl_returns_for_tuples!(R1, R2, R3, R4);
impl_returns_for_tuples!(R1, R2, R3, R4, R5);
impl_returns_for_tuples!(R1, R2, R3, R4, R5, R6);

/// A place a returned value can be copied into.
pub trait ReturnTarget {
  fn target_type(&self) -> TypeId;
  fn target_type_name(&self) -> &'static str;
  /// Stores `value`, handing it back if it has the wrong type.
  fn assign(&mut self, value: Box<dyn Any>) -> std::result::Result<(), Box<dyn Any>>;
}

impl<T: 'static> ReturnTarget for Option<T> {
  fn target_type(&self) -> TypeId {
    TypeId::of::<T>()
  }

  fn target_type_name(&self) -> &'static str {
    std::any::type_name::<T>()
  }

  fn assign(&mut self, value: Box<dyn Any>) -> std::result::Result<(), Box<dyn Any>> {
    *self = Some(*value.downcast::<T>()?);
    Ok(())
  }
}

/// Copies `outputs` into `targets`. Every target type is checked before any
/// target is written.
pub(crate) fn assign_returns(
  outputs: Vec<Returned>,
  targets: &mut [&mut dyn ReturnTarget],
) -> Result<()> {
  if targets.len() != outputs.len() {
    return Err(Error::ReturnCountMismatch {
      outputs: outputs.len(),
      targets: targets.len(),
    });
  }

  for (index, (output, target)) in outputs.iter().zip(targets.iter()).enumerate() {
    if output.type_id != target.target_type() {
      return Err(Error::ReturnTypeMismatch {
        index,
        expected: target.target_type_name(),
        found: output.type_name,
      });
    }
  }

  for (index, (output, target)) in outputs.into_iter().zip(targets.iter_mut()).enumerate() {
    let found = output.type_name;
    target
      .assign(output.value)
      .map_err(|_| Error::ReturnTypeMismatch {
        index,
        expected: target.target_type_name(),
        found,
      })?;
  }

  Ok(())
}
