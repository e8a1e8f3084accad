use fibre_di::{BindConfig, Registry, ResolveConfig};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn new_tracker() -> Arc<RequestTracker> {
  Arc::new(RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  })
}

fn main() -> fibre_di::Result<()> {
  let registry = Registry::new();

  // --- Singleton Binding ---
  // The constructor runs right here, once.
  registry.bind_singleton(new_tracker, BindConfig::named("singleton_tracker"))?;

  // --- Factory Binding ---
  // The constructor runs on every resolution.
  registry.bind_factory(new_tracker, BindConfig::named("factory_tracker"))?;

  let resolver = registry.resolver();

  println!("--- Resolving Singletons ---");
  let s1 = resolver.resolve::<RequestTracker>(ResolveConfig::named("singleton_tracker"))?;
  let s2 = resolver.resolve::<RequestTracker>(ResolveConfig::named("singleton_tracker"))?;
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  println!("--- Resolving Factories ---");
  let t1 = resolver.resolve::<RequestTracker>(ResolveConfig::named("factory_tracker"))?;
  let t2 = resolver.resolve::<RequestTracker>(ResolveConfig::named("factory_tracker"))?;
  println!("Factory 1 ID: {}, Factory 2 ID: {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
  assert!(!Arc::ptr_eq(&t1, &t2), "Factory instances should be different");

  println!("{:#?}", registry);
  Ok(())
}
