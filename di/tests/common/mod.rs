#![allow(dead_code)]

use fibre_di::{BoxError, PostConstruct, Resolver};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

// --- Shared Test Fixtures ---

pub trait Shape: Send + Sync {
  fn set_area(&self, area: i32);
  fn area(&self) -> i32;
}

pub struct Circle {
  area: AtomicI32,
}

impl Circle {
  pub fn new() -> Self {
    Self { area: AtomicI32::new(100500) }
  }
}

impl Shape for Circle {
  fn set_area(&self, area: i32) {
    self.area.store(area, Ordering::SeqCst);
  }

  fn area(&self) -> i32 {
    self.area.load(Ordering::SeqCst)
  }
}

pub struct Rectangle {
  area: AtomicI32,
}

impl Rectangle {
  pub fn new() -> Self {
    Self { area: AtomicI32::new(256) }
  }
}

impl Shape for Rectangle {
  fn set_area(&self, area: i32) {
    self.area.store(area, Ordering::SeqCst);
  }

  fn area(&self) -> i32 {
    self.area.load(Ordering::SeqCst)
  }
}

pub trait Database: Send + Sync {
  fn name(&self) -> &str;
}

pub struct MySql;

impl Database for MySql {
  fn name(&self) -> &str {
    "mysql"
  }
}

/// A database whose post-construction hook fails with the error it holds.
pub struct MongoDb {
  pub failure: Option<String>,
}

impl Database for MongoDb {
  fn name(&self) -> &str {
    "mongo"
  }
}

impl PostConstruct for MongoDb {
  fn post_construct(&self, _resolver: &Resolver) -> fibre_di::Result<()> {
    match &self.failure {
      Some(message) => Err(fibre_di::Error::construction(message.clone())),
      None => Ok(()),
    }
  }
}

pub fn circle() -> Arc<dyn Shape> {
  Arc::new(Circle::new())
}

pub fn rectangle() -> Arc<dyn Shape> {
  Arc::new(Rectangle::new())
}

pub fn mysql() -> Arc<dyn Database> {
  Arc::new(MySql)
}

pub fn dummy_error() -> BoxError {
  "dummy error".into()
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}
