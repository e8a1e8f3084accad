use fibre_di::{BindConfig, Registry, ResolveConfig, Resolver};
use std::collections::HashMap;
use std::sync::Arc;

trait Plugin: Send + Sync {
  fn name(&self) -> &'static str;
}

struct Core;
impl Plugin for Core {
  fn name(&self) -> &'static str {
    "core"
  }
}

struct Extra;
impl Plugin for Extra {
  fn name(&self) -> &'static str {
    "extra"
  }
}

fn main() -> fibre_di::Result<()> {
  // Application-wide bindings.
  let app = Registry::new();
  app.bind_singleton(|| Arc::new(Core) as Arc<dyn Plugin>, BindConfig::named("core"))?;
  app.bind_singleton(|| Arc::new(String::from("production")), BindConfig::new())?;

  // Request-scoped bindings shadow the application ones.
  let request = Registry::new();
  request.bind_singleton(|| Arc::new(Extra) as Arc<dyn Plugin>, BindConfig::named("extra"))?;
  request.bind_singleton(|| Arc::new(String::from("request")), BindConfig::new())?;

  let resolver = Resolver::new([request.clone(), app.clone()]);

  let environment = resolver.resolve::<String>(ResolveConfig::default())?;
  println!("Environment: {}", environment);
  assert_eq!(*environment, "request");

  // Collections gather bindings from every registry in the chain.
  let mut plugins: Vec<Arc<dyn Plugin>> = Vec::new();
  resolver.fill(&mut plugins)?;
  let names: Vec<_> = plugins.iter().map(|p| p.name()).collect();
  println!("Plugins: {:?}", names);
  assert_eq!(names, ["extra", "core"]);

  let mut by_name: HashMap<String, Arc<dyn Plugin>> = HashMap::new();
  resolver.fill(&mut by_name)?;
  assert_eq!(by_name.len(), 2);

  // Dropping the request scope leaves the application bindings.
  request.reset();
  let environment = resolver.resolve::<String>(ResolveConfig::default())?;
  assert_eq!(*environment, "production");
  Ok(())
}
