//! Filling receivers from bindings: annotated struct fields, sequences and
//! string-keyed maps.

use crate::core::DEFAULT_NAME;
use crate::error::{Error, Result};
use crate::resolver::Resolver;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

/// A receiver that [`Resolver::fill`] can populate.
///
/// Implemented for `Vec<Arc<T>>` (every binding of `T`), `HashMap<String,
/// Arc<T>>` (every binding of `T` by name), `Box<F>`, and structs declared
/// with [`fill_struct!`](crate::fill_struct).
pub trait Fill {
  fn fill(&mut self, resolver: &Resolver) -> Result<()>;
}

impl<T> Fill for Vec<Arc<T>>
where
  T: ?Sized + Send + Sync + 'static,
{
  fn fill(&mut self, resolver: &Resolver) -> Result<()> {
    let collected = resolver.collect::<T>(false)?;
    *self = collected.into_iter().map(|(_, value)| value).collect();
    Ok(())
  }
}

impl<K, T, S> Fill for HashMap<K, Arc<T>, S>
where
  K: Eq + Hash + 'static,
  T: ?Sized + Send + Sync + 'static,
  S: BuildHasher,
{
  fn fill(&mut self, resolver: &Resolver) -> Result<()> {
    if TypeId::of::<K>() != TypeId::of::<String>() {
      return Err(Error::InvalidReceiver(format!(
        "map keys must be String, found {}",
        std::any::type_name::<K>()
      )));
    }

    let collected = resolver.collect::<T>(true)?;
    self.clear();
    for (name, value) in collected {
      let key = (Box::new(name) as Box<dyn Any>)
        .downcast::<K>()
        .map_err(|_| Error::InvalidReceiver(std::any::type_name::<Self>().to_owned()))?;
      self.insert(*key, value);
    }
    Ok(())
  }
}

impl<F: Fill + ?Sized> Fill for Box<F> {
  fn fill(&mut self, resolver: &Resolver) -> Result<()> {
    (**self).fill(resolver)
  }
}

/// A struct field that an annotation can target.
///
/// `type` and `name` annotations call [`Field::inject`]; `recursive` calls
/// [`Field::fill_nested`]. `None` means the field cannot honour the
/// annotation.
pub trait Field {
  fn inject(&mut self, _resolver: &Resolver, _name: &str) -> Option<Result<()>> {
    None
  }

  fn fill_nested(&mut self, _resolver: &Resolver) -> Option<Result<()>> {
    None
  }
}

impl<T> Field for Option<Arc<T>>
where
  T: ?Sized + Send + Sync + 'static,
{
  fn inject(&mut self, resolver: &Resolver, name: &str) -> Option<Result<()>> {
    Some(resolver.resolve_named::<T>(name).map(|value| *self = Some(value)))
  }
}

impl<T> Field for Vec<Arc<T>>
where
  T: ?Sized + Send + Sync + 'static,
{
  fn fill_nested(&mut self, resolver: &Resolver) -> Option<Result<()>> {
    Some(self.fill(resolver))
  }
}

impl<K, T, S> Field for HashMap<K, Arc<T>, S>
where
  K: Eq + Hash + 'static,
  T: ?Sized + Send + Sync + 'static,
  S: BuildHasher,
{
  fn fill_nested(&mut self, resolver: &Resolver) -> Option<Result<()>> {
    Some(self.fill(resolver))
  }
}

impl<F: Fill + ?Sized> Field for Box<F> {
  fn fill_nested(&mut self, resolver: &Resolver) -> Option<Result<()>> {
    Some((**self).fill(resolver))
  }
}

// --- Annotations ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
  /// By field type, under the default name.
  Type,
  /// By field type, under the field's identifier.
  Name,
  /// Fill the field's current value.
  Recursive,
}

/// A parsed field annotation such as `"type,omitempty"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
  pub lookup: Lookup,
  pub omit_empty: bool,
}

impl Tag {
  /// Parses a comma-separated annotation: at most one of `type` or `name`,
  /// plus the `recursive` and `omitempty` modifiers. `recursive` may stand
  /// alone and takes precedence over the lookup kind.
  pub fn parse(raw: &str) -> Option<Self> {
    let mut kind = None;
    let mut recursive = false;
    let mut omit_empty = false;

    for part in raw.split(',').map(str::trim) {
      let flag = match part {
        "type" | "name" => {
          let lookup = if part == "type" { Lookup::Type } else { Lookup::Name };
          if kind.replace(lookup).is_some() {
            return None;
          }
          continue;
        }
        "recursive" => &mut recursive,
        "omitempty" => &mut omit_empty,
        _ => return None,
      };
      if std::mem::replace(flag, true) {
        return None;
      }
    }

    let lookup = if recursive { Lookup::Recursive } else { kind? };
    Some(Self { lookup, omit_empty })
  }
}

/// One annotated field of a fillable struct.
#[derive(Debug, Clone)]
pub struct FieldPlan {
  pub field: &'static str,
  pub raw: &'static str,
  pub tag: Tag,
}

impl FieldPlan {
  fn invalid(&self) -> Error {
    Error::InvalidFieldTag {
      field: self.field.to_owned(),
      tag: self.raw.to_owned(),
    }
  }
}

static PLANS: Lazy<DashMap<TypeId, Arc<[FieldPlan]>>> = Lazy::new(DashMap::new);

/// The parsed annotations of struct `S`, computed on first use and cached.
pub fn plan<S: 'static>(fields: &[(&'static str, &'static str)]) -> Result<Arc<[FieldPlan]>> {
  let id = TypeId::of::<S>();
  if let Some(cached) = PLANS.get(&id) {
    return Ok(Arc::clone(cached.value()));
  }

  let parsed = fields
    .iter()
    .map(|&(field, raw)| {
      Tag::parse(raw)
        .map(|tag| FieldPlan { field, raw, tag })
        .ok_or_else(|| Error::InvalidFieldTag {
          field: field.to_owned(),
          tag: raw.to_owned(),
        })
    })
    .collect::<Result<Arc<[FieldPlan]>>>()?;

  tracing::trace!(receiver = std::any::type_name::<S>(), fields = parsed.len(), "cached fill plan");
  Ok(Arc::clone(PLANS.entry(id).or_insert(parsed).value()))
}

/// Fills one field according to its plan.
pub fn apply<F: Field + ?Sized>(field: &mut F, plan: &FieldPlan, resolver: &Resolver) -> Result<()> {
  let outcome = match plan.tag.lookup {
    Lookup::Type => field.inject(resolver, DEFAULT_NAME),
    Lookup::Name => field.inject(resolver, plan.field),
    Lookup::Recursive => field.fill_nested(resolver),
  };

  match outcome {
    None => Err(plan.invalid()),
    Some(Err(e)) if plan.tag.omit_empty && e.is_not_found() => {
      tracing::trace!(field = plan.field, "left empty: {}", e);
      Ok(())
    }
    Some(result) => result,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_kinds_and_modifiers() {
    assert_eq!(
      Tag::parse("type"),
      Some(Tag { lookup: Lookup::Type, omit_empty: false })
    );
    assert_eq!(
      Tag::parse("name, omitempty"),
      Some(Tag { lookup: Lookup::Name, omit_empty: true })
    );
    assert_eq!(
      Tag::parse("omitempty,recursive"),
      Some(Tag { lookup: Lookup::Recursive, omit_empty: true })
    );
  }

  #[test]
  fn recursive_combines_with_lookup_kinds() {
    assert_eq!(
      Tag::parse("type,recursive"),
      Some(Tag { lookup: Lookup::Recursive, omit_empty: false })
    );
    assert_eq!(
      Tag::parse("recursive, name, omitempty"),
      Some(Tag { lookup: Lookup::Recursive, omit_empty: true })
    );
  }

  #[test]
  fn rejects_malformed_annotations() {
    for raw in ["", "invalid", "omitempty", "type,name", "type,", "type,omitempty,omitempty", "recursive,recursive"] {
      assert_eq!(Tag::parse(raw), None, "{raw:?} should not parse");
    }
  }

  #[test]
  fn plans_are_cached_per_type() {
    struct Receiver;

    let first = plan::<Receiver>(&[("s", "type"), ("r", "name")]).unwrap();
    let second = plan::<Receiver>(&[("s", "type"), ("r", "name")]).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first[1].tag.lookup, Lookup::Name);
  }

  #[test]
  fn invalid_plan_names_the_field() {
    struct Broken;

    let error = plan::<Broken>(&[("s", "invalid")]).unwrap_err();
    assert!(matches!(error, Error::InvalidFieldTag { ref field, ref tag } if field == "s" && tag == "invalid"));
  }

  #[test]
  fn unsupported_annotation_is_invalid() {
    let resolver = crate::Registry::new().resolver();
    let mut field: Vec<Arc<String>> = Vec::new();
    let plan = FieldPlan {
      field: "list",
      raw: "type",
      tag: Tag { lookup: Lookup::Type, omit_empty: true },
    };

    let error = apply(&mut field, &plan, &resolver).unwrap_err();
    assert!(matches!(error, Error::InvalidFieldTag { .. }));
  }
}
