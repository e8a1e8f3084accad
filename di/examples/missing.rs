use fibre_di::{fill_struct, satisfies, CallConfig, Registry, ResolveConfig};
use std::sync::Arc;

trait Cache: Send + Sync {
  fn hit_rate(&self) -> f64;
}

struct InMemoryCache;
impl Cache for InMemoryCache {
  fn hit_rate(&self) -> f64 {
    0.93
  }
}

#[derive(Default)]
struct Handlers {
  cache: Option<Arc<dyn Cache>>,
}

fill_struct!(Handlers { cache: "type,omitempty" });

fn main() {
  let resolver = Registry::new().resolver();

  // --- Missing bindings are ordinary errors ---
  match resolver.resolve::<dyn Cache>(ResolveConfig::default()) {
    Ok(_) => panic!("Should not have found the cache!"),
    Err(e) => {
      assert!(e.is_not_found());
      println!("Correctly received: {}", e);
    }
  }

  // --- Optional fields stay empty ---
  let mut handlers = Handlers::default();
  resolver.fill(&mut handlers).expect("omitempty fields never fail");
  assert!(handlers.cache.is_none());
  println!("Optional cache field left empty.");

  // --- Overrides supply what the registries lack ---
  resolver
    .with([satisfies!(Arc::new(InMemoryCache) => dyn Cache)])
    .call(
      |cache: Arc<dyn Cache>| println!("Override cache hit rate: {}", cache.hit_rate()),
      CallConfig::new(),
    )
    .expect("override satisfies the parameter");
}
