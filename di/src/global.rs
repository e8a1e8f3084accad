//! The process-wide resolver slot.
//!
//! Nothing is installed until the application calls [`install`]; there is no
//! implicit default resolver.

use crate::error::{Error, Result};
use crate::resolver::Resolver;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

static GLOBAL_RESOLVER: Lazy<RwLock<Option<Resolver>>> = Lazy::new(|| RwLock::new(None));

/// Installs `resolver` as the process-wide resolver, returning the one it
/// replaces.
///
/// # Examples
///
/// ```
/// use fibre_di::{global, install, uninstall, Registry};
///
/// let previous = install(Registry::new().resolver());
/// assert!(global().is_ok());
/// # uninstall();
/// # drop(previous);
/// ```
pub fn install(resolver: Resolver) -> Option<Resolver> {
  tracing::debug!("installed global resolver");
  GLOBAL_RESOLVER.write().replace(resolver)
}

/// The installed resolver, or [`Error::NotInstalled`].
pub fn global() -> Result<Resolver> {
  GLOBAL_RESOLVER.read().clone().ok_or(Error::NotInstalled)
}

/// Removes the installed resolver, if any.
pub fn uninstall() -> Option<Resolver> {
  let removed = GLOBAL_RESOLVER.write().take();
  if removed.is_some() {
    tracing::debug!("uninstalled global resolver");
  }
  removed
}
