use thiserror::Error;

/// A boxed error returned by user constructors, hooks and called functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for binding and resolution operations.
#[derive(Debug, Error)]
pub enum Error {
  /// The constructor returns no value other than an optional error.
  #[error("the constructor must return useful values")]
  NoUsefulReturn,

  /// A factory constructor returns more than one useful value.
  #[error("factory constructors must return exactly one value and optionally one error, found {found}")]
  FactoryArity { found: usize },

  /// A multi-value constructor was bound with an unusable number of names.
  #[error("the constructor returns {values} values but {names} names were given, expected 1 or {values}")]
  NameCountMismatch { values: usize, names: usize },

  /// No registry in the chain holds a binding for the requested type and name.
  #[error("no binding found for {type_name}{}", name_suffix(.name))]
  NotFound {
    type_name: &'static str,
    name: Option<String>,
  },

  #[error("invalid receiver: {0}")]
  InvalidReceiver(String),

  /// A struct field carries an annotation that is unknown or that the field's
  /// type cannot honour.
  #[error("field '{field}' has an invalid annotation '{tag}'")]
  InvalidFieldTag { field: String, tag: String },

  #[error("cannot assign {outputs} returned values to {targets} targets")]
  ReturnCountMismatch { outputs: usize, targets: usize },

  #[error("cannot assign returned value #{index} of type {found} to {expected}")]
  ReturnTypeMismatch {
    index: usize,
    expected: &'static str,
    found: &'static str,
  },

  /// No process-wide resolver has been installed.
  #[error("no global resolver installed")]
  NotInstalled,

  /// An error produced by a constructor, a hook or a called function.
  #[error(transparent)]
  Construction(BoxError),
}

/// A specialized `Result` type for `fibre_di` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Wraps a user error. Errors that already are an [`Error`] are unwrapped
  /// so that, for example, a `NotFound` raised inside a constructor still
  /// reads as `NotFound` to the caller.
  pub fn construction(error: impl Into<BoxError>) -> Self {
    match error.into().downcast::<Error>() {
      Ok(error) => *error,
      Err(other) => Error::Construction(other),
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::NotFound { .. })
  }

  pub(crate) fn not_found(type_name: &'static str, name: &str) -> Self {
    Error::NotFound {
      type_name,
      name: Some(name.to_owned()),
    }
  }

  pub(crate) fn not_fillable(type_name: &'static str) -> Self {
    Error::InvalidReceiver(format!(
      "{} cannot be filled, construct it with Managed::fillable",
      type_name
    ))
  }

  pub(crate) fn none_found(type_name: &'static str) -> Self {
    Error::NotFound {
      type_name,
      name: None,
    }
  }
}

fn name_suffix(name: &Option<String>) -> String {
  match name {
    Some(name) => format!(" named '{}'", name),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug)]
  struct Dummy;

  impl std::fmt::Display for Dummy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "dummy error")
    }
  }

  impl std::error::Error for Dummy {}

  #[test]
  fn construction_unwraps_own_errors() {
    let error = Error::construction(Error::not_found("dyn Shape", "default"));
    assert!(error.is_not_found());

    let error = Error::construction(Dummy);
    assert!(matches!(error, Error::Construction(_)));
    assert_eq!(error.to_string(), "dummy error");
  }

  #[test]
  fn not_found_messages() {
    assert_eq!(
      Error::not_found("dyn Shape", "kek").to_string(),
      "no binding found for dyn Shape named 'kek'"
    );
    assert_eq!(
      Error::none_found("dyn Shape").to_string(),
      "no binding found for dyn Shape"
    );
  }
}
