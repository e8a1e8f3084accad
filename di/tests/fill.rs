mod common;

use common::*;
use fibre_di::{fill_struct, BindConfig, Error, Managed, Registry, ResolveConfig, Resolver};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Fillable Fixtures ---

#[derive(Default)]
struct Inner {
  u: Option<Arc<dyn Shape>>,
}

fill_struct!(Inner { u: "type" });

#[derive(Default)]
struct Target {
  s: Option<Arc<dyn Shape>>,
  d: Option<Arc<dyn Database>>,
  r: Option<Arc<dyn Shape>>,
  boxed: Box<Inner>,
  x: String,
  y: i32,
}

fill_struct!(Target {
  s: "type",
  d: "type",
  r: "name",
  boxed: "recursive",
});

#[derive(Default)]
struct Optional {
  s: Option<Arc<dyn Shape>>,
  d: Option<Arc<dyn Database>>,
}

fill_struct!(Optional {
  s: "type,omitempty",
  d: "type",
});

#[derive(Default)]
struct Required {
  s: Option<Arc<dyn Shape>>,
  d: Option<Arc<dyn Database>>,
}

fill_struct!(Required { s: "type", d: "type" });

#[derive(Default)]
struct Collections {
  list: Vec<Arc<dyn Shape>>,
  dict: HashMap<String, Arc<dyn Shape>>,
}

fill_struct!(Collections {
  list: "recursive",
  dict: "recursive",
});

#[derive(Default)]
struct Nested {
  inner: Inner,
}

fill_struct!(Nested { inner: "recursive" });

fn shapes_registry() -> Registry {
  let registry = Registry::new();
  registry.bind_singleton(circle, BindConfig::named("circle")).unwrap();
  registry.bind_singleton(rectangle, BindConfig::named("square")).unwrap();
  registry
}

// --- Struct Fill ---

#[test]
fn test_fill_struct() {
  init_tracing();

  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(circle, BindConfig::new()).unwrap();
  registry.bind_singleton(rectangle, BindConfig::named("r")).unwrap();
  registry.bind_singleton(mysql, BindConfig::new()).unwrap();
  let mut target = Target {
    x: "dummy string".to_string(),
    y: 100,
    ..Target::default()
  };

  // Act
  registry.resolver().fill(&mut target).unwrap();

  // Assert
  assert_eq!(target.s.unwrap().area(), 100500);
  assert_eq!(target.d.unwrap().name(), "mysql");
  assert_eq!(target.r.unwrap().area(), 256);
  assert_eq!(target.boxed.u.as_ref().unwrap().area(), 100500);
  assert_eq!(target.x, "dummy string");
  assert_eq!(target.y, 100);
}

#[test]
fn test_fill_struct_omitempty() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(mysql, BindConfig::new()).unwrap();
  let resolver = registry.resolver();

  // Act
  let mut required = Required::default();
  let failed = resolver.fill(&mut required);

  let mut optional = Optional::default();
  let filled = resolver.fill(&mut optional);

  // Assert
  assert!(failed.unwrap_err().is_not_found());
  filled.unwrap();
  assert!(optional.s.is_none());
  assert_eq!(optional.d.unwrap().name(), "mysql");
}

#[test]
fn test_fill_struct_missing_name() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(rectangle, BindConfig::named("R")).unwrap();

  #[derive(Default)]
  struct ByName {
    s: Option<Arc<dyn Shape>>,
  }
  fill_struct!(ByName { s: "name" });

  // Act
  let error = registry.resolver().fill(&mut ByName::default()).unwrap_err();

  // Assert
  assert!(matches!(error, Error::NotFound { name: Some(ref name), .. } if name == "s"));
}

#[test]
fn test_fill_struct_invalid_tag() {
  // Arrange
  #[derive(Default)]
  struct Invalid {
    s: Option<Arc<dyn Shape>>,
  }
  fill_struct!(Invalid { s: "invalid" });

  // Act
  let error = Registry::new()
    .resolver()
    .fill(&mut Invalid::default())
    .unwrap_err();

  // Assert
  assert_eq!(error.to_string(), "field 's' has an invalid annotation 'invalid'");
}

#[test]
fn test_fill_struct_annotation_field_cannot_honour() {
  // Arrange
  #[derive(Default)]
  struct Mismatched {
    list: Vec<Arc<dyn Shape>>,
  }
  fill_struct!(Mismatched { list: "type" });

  // Act
  let error = shapes_registry()
    .resolver()
    .fill(&mut Mismatched::default())
    .unwrap_err();

  // Assert
  assert!(matches!(error, Error::InvalidFieldTag { .. }));
}

#[test]
fn test_fill_recursive_struct() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(rectangle, BindConfig::new()).unwrap();
  let mut nested = Nested::default();

  // Act
  registry.resolver().fill(&mut nested).unwrap();

  // Assert
  assert_eq!(nested.inner.u.unwrap().area(), 256);
}

#[derive(Default)]
struct Wrapper {
  typed: Box<Inner>,
  named: Inner,
}

fill_struct!(Wrapper {
  typed: "type,recursive",
  named: "name,recursive,omitempty",
});

#[test]
fn test_fill_recursive_combined_with_lookup_kind() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(circle, BindConfig::new()).unwrap();
  let mut wrapper = Wrapper::default();

  // Act
  registry.resolver().fill(&mut wrapper).unwrap();

  // Assert: both fields are filled in place rather than looked up.
  assert_eq!(wrapper.typed.u.as_ref().unwrap().area(), 100500);
  assert_eq!(wrapper.named.u.as_ref().unwrap().area(), 100500);
}

#[test]
fn test_fill_struct_with_collections() {
  // Arrange
  let mut target = Collections::default();

  // Act
  shapes_registry().resolver().fill(&mut target).unwrap();

  // Assert
  assert_eq!(target.list.len(), 2);
  assert_eq!(target.dict.len(), 2);
  assert_eq!(target.dict["circle"].area(), 100500);
  assert_eq!(target.dict["square"].area(), 256);
}

// --- Sequence Fill ---

#[test]
fn test_fill_vec() {
  // Arrange
  let mut shapes: Vec<Arc<dyn Shape>> = Vec::new();

  // Act
  shapes_registry().resolver().fill(&mut shapes).unwrap();

  // Assert: names are visited in order within a registry.
  let areas: Vec<_> = shapes.iter().map(|s| s.area()).collect();
  assert_eq!(areas, [100500, 256]);
}

#[test]
fn test_fill_vec_across_registries() {
  // Arrange
  let first = Registry::new();
  let second = Registry::new();
  first.bind_singleton(rectangle, BindConfig::new()).unwrap();
  second.bind_singleton(circle, BindConfig::new()).unwrap();
  let mut shapes: Vec<Arc<dyn Shape>> = Vec::new();

  // Act
  Resolver::new([first, second]).fill(&mut shapes).unwrap();

  // Assert
  let areas: Vec<_> = shapes.iter().map(|s| s.area()).collect();
  assert_eq!(areas, [256, 100500]);
}

#[test]
fn test_fill_vec_unbound() {
  // Arrange
  let mut shapes: Vec<Arc<dyn Shape>> = Vec::new();

  // Act
  let error = Registry::new().resolver().fill(&mut shapes).unwrap_err();

  // Assert
  assert!(matches!(error, Error::NotFound { name: None, .. }));
  assert!(shapes.is_empty());
}

#[test]
fn test_fill_vec_factory_error() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(mysql, BindConfig::named("mysql")).unwrap();
  registry
    .bind_factory(
      || {
        Managed::new(MongoDb {
          failure: Some("dummy error".to_string()),
        })
        .hooked()
        .map(|db| db as Arc<dyn Database>)
      },
      BindConfig::named("mongo"),
    )
    .unwrap();
  let mut list: Vec<Arc<dyn Database>> = Vec::new();

  // Act
  let error = registry.resolver().fill(&mut list).unwrap_err();

  // Assert
  assert_eq!(error.to_string(), "dummy error");
}

// --- Map Fill ---

#[test]
fn test_fill_map() {
  // Arrange
  let mut shapes: HashMap<String, Arc<dyn Shape>> = HashMap::new();

  // Act
  shapes_registry().resolver().fill(&mut shapes).unwrap();

  // Assert
  assert_eq!(shapes.len(), 2);
  assert_eq!(shapes["circle"].area(), 100500);
  assert_eq!(shapes["square"].area(), 256);
}

#[test]
fn test_fill_map_first_registry_keeps_name() {
  static SHADOWED: AtomicUsize = AtomicUsize::new(0);

  // Arrange
  let first = Registry::new();
  let second = Registry::new();
  first.bind_singleton(circle, BindConfig::named("shape")).unwrap();
  second
    .bind_factory(
      || {
        SHADOWED.fetch_add(1, Ordering::SeqCst);
        rectangle()
      },
      BindConfig::named("shape"),
    )
    .unwrap();
  second.bind_singleton(rectangle, BindConfig::named("other")).unwrap();
  let mut shapes: HashMap<String, Arc<dyn Shape>> = HashMap::new();

  // Act
  Resolver::new([first, second]).fill(&mut shapes).unwrap();

  // Assert: the shadowed factory is never invoked.
  assert_eq!(shapes.len(), 2);
  assert_eq!(shapes["shape"].area(), 100500);
  assert_eq!(shapes["other"].area(), 256);
  assert_eq!(SHADOWED.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fill_map_with_invalid_keys() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(circle, BindConfig::new()).unwrap();
  let mut shapes: HashMap<u32, Arc<dyn Shape>> = HashMap::new();

  // Act
  let error = registry.resolver().fill(&mut shapes).unwrap_err();

  // Assert
  assert!(matches!(error, Error::InvalidReceiver(_)));
}

#[test]
fn test_fill_map_unbound() {
  // Arrange
  let mut shapes: HashMap<String, Arc<dyn Shape>> = HashMap::new();

  // Act
  let error = Registry::new().resolver().fill(&mut shapes).unwrap_err();

  // Assert
  assert!(error.is_not_found());
}

// --- Fill After Construction ---

#[derive(Default)]
struct Holder {
  shape: Option<Arc<dyn Shape>>,
}

fill_struct!(Holder { shape: "type" });

#[test]
fn test_bind_with_fill_flag_fills_produced_value() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(circle, BindConfig::new()).unwrap();

  // Act
  registry
    .bind_singleton(|| Managed::fillable(Holder::default()), BindConfig::new().with_fill())
    .unwrap();
  registry
    .bind_factory(|| Managed::fillable(Holder::default()), BindConfig::named("lazy").with_fill())
    .unwrap();
  registry
    .bind_singleton(|| Managed::fillable(Holder::default()), BindConfig::named("unfilled"))
    .unwrap();

  // Assert
  let resolver = registry.resolver();
  let eager = resolver.resolve::<Holder>(ResolveConfig::default()).unwrap();
  let lazy = resolver.resolve::<Holder>(ResolveConfig::named("lazy")).unwrap();
  let unfilled = resolver.resolve::<Holder>(ResolveConfig::named("unfilled")).unwrap();
  assert_eq!(eager.shape.as_ref().unwrap().area(), 100500);
  assert_eq!(lazy.shape.as_ref().unwrap().area(), 100500);
  assert!(unfilled.shape.is_none());
}

#[test]
fn test_fill_error_aborts_bind() {
  // Arrange
  let registry = Registry::new();

  // Act
  let result = registry.bind_singleton(|| Managed::fillable(Holder::default()), BindConfig::new().with_fill());

  // Assert
  assert!(result.unwrap_err().is_not_found());
  assert!(registry.is_empty());
}

#[test]
fn test_fill_flag_rejects_plain_singleton() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(circle, BindConfig::new()).unwrap();

  // Act
  let plain = registry.bind_singleton(|| Arc::new(Holder::default()), BindConfig::named("plain").with_fill());
  let wrapped = registry.bind_singleton(|| Managed::new(Holder::default()), BindConfig::named("wrapped").with_fill());

  // Assert
  for result in [plain, wrapped] {
    let error = result.unwrap_err();
    assert!(matches!(error, Error::InvalidReceiver(_)));
    assert!(error.to_string().contains("Holder"));
  }
  assert!(registry
    .resolver()
    .resolve::<Holder>(ResolveConfig::named("plain"))
    .map(|_| ())
    .unwrap_err()
    .is_not_found());
}

#[test]
fn test_fill_flag_rejects_plain_factory_on_resolve() {
  // Arrange
  let registry = Registry::new();
  registry.bind_singleton(circle, BindConfig::new()).unwrap();
  registry
    .bind_factory(|| Arc::new(Holder::default()), BindConfig::named("plain").with_fill())
    .unwrap();
  registry
    .bind_factory(
      || Managed::new(Holder::default()),
      BindConfig::named("wrapped").with_fill(),
    )
    .unwrap();
  let resolver = registry.resolver();

  // Act
  let plain = resolver.resolve::<Holder>(ResolveConfig::named("plain")).map(|_| ());
  let wrapped = resolver.resolve::<Holder>(ResolveConfig::named("wrapped")).map(|_| ());

  // Assert
  assert!(matches!(plain, Err(Error::InvalidReceiver(_))));
  assert!(matches!(wrapped, Err(Error::InvalidReceiver(_))));
}
