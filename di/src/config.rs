//! Configuration records read by the bind, resolve and call operations.

use crate::core::DEFAULT_NAME;
use crate::invoke::ReturnTarget;
use std::fmt;

/// Options for `Registry::bind_*`.
///
/// ```
/// use fibre_di::BindConfig;
///
/// let config = BindConfig::named("primary").name("fallback").with_fill();
/// assert_eq!(config.names, ["primary", "fallback"]);
/// assert!(config.fill);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize, serde::Deserialize),
  serde(default)
)]
pub struct BindConfig {
  /// Names to bind under. Empty means [`DEFAULT_NAME`].
  pub names: Vec<String>,
  /// Fill produced values after construction. Ignored by implementation
  /// bindings.
  pub fill: bool,
}

impl BindConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn named(name: impl Into<String>) -> Self {
    Self::new().name(name)
  }

  /// Appends a name.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.names.push(name.into());
    self
  }

  /// Appends several names.
  pub fn names<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.names.extend(names.into_iter().map(Into::into));
    self
  }

  /// Fill produced values after construction. Only values built with
  /// `Managed::fillable` can be filled; anything else fails the binding.
  pub fn with_fill(mut self) -> Self {
    self.fill = true;
    self
  }

  /// The names to store under, falling back to the default name.
  pub(crate) fn effective_names(&self) -> Vec<String> {
    if self.names.is_empty() {
      vec![DEFAULT_NAME.to_owned()]
    } else {
      self.names.clone()
    }
  }
}

/// Options for `Resolver::resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize, serde::Deserialize),
  serde(default)
)]
pub struct ResolveConfig {
  pub name: String,
}

impl ResolveConfig {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl Default for ResolveConfig {
  fn default() -> Self {
    Self {
      name: DEFAULT_NAME.to_owned(),
    }
  }
}

/// Options for `Resolver::call`: where to copy the function's returned values.
///
/// ```
/// use fibre_di::{CallConfig, Registry};
///
/// let mut greeting: Option<String> = None;
/// let mut count: Option<u32> = None;
///
/// Registry::new()
///   .resolver()
///   .call(
///     || ("hello".to_string(), 2u32),
///     CallConfig::new().returning(&mut greeting).returning(&mut count),
///   )
///   .unwrap();
///
/// assert_eq!(greeting.as_deref(), Some("hello"));
/// assert_eq!(count, Some(2));
/// ```
#[derive(Default)]
pub struct CallConfig<'a> {
  pub returns: Vec<&'a mut dyn ReturnTarget>,
}

impl<'a> CallConfig<'a> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a target for the next returned value.
  pub fn returning<T: 'static>(mut self, target: &'a mut Option<T>) -> Self {
    self.returns.push(target);
    self
  }
}

impl fmt::Debug for CallConfig<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let targets: Vec<_> = self.returns.iter().map(|t| t.target_type_name()).collect();
    f.debug_struct("CallConfig").field("returns", &targets).finish()
  }
}
