//! Public macros for the global resolver, fillable structs and overrides.

/// Resolves a binding from the installed global resolver.
///
/// Evaluates to `Result<Arc<T>>`. Fails with `Error::NotInstalled` when no
/// resolver is installed.
///
/// # Examples
///
/// ```
/// use fibre_di::{install, resolve, uninstall, BindConfig, Registry};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
///
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter {
///   fn greet(&self) -> String {
///     "Hello!".to_string()
///   }
/// }
///
/// let registry = Registry::new();
/// registry
///   .bind_singleton(|| Arc::new(EnglishGreeter) as Arc<dyn Greeter>, BindConfig::new())
///   .unwrap();
/// registry
///   .bind_singleton(|| Arc::new(String::from("hello")), BindConfig::named("greeting"))
///   .unwrap();
/// install(registry.resolver());
///
/// assert_eq!(resolve!(dyn Greeter).unwrap().greet(), "Hello!");
/// assert_eq!(*resolve!(String, "greeting").unwrap(), "hello");
/// assert!(resolve!(String).unwrap_err().is_not_found());
/// # uninstall();
/// ```
#[macro_export]
macro_rules! resolve {
    ($type:ty) => {
        $crate::global().and_then(|resolver| {
            resolver.resolve::<$type>($crate::ResolveConfig::default())
        })
    };

    ($type:ty, $name:expr) => {
        $crate::global().and_then(|resolver| {
            resolver.resolve::<$type>($crate::ResolveConfig::named($name))
        })
    };
}

/// Declares the annotated fields of a struct, making it fillable.
///
/// Each listed field carries an annotation: `"type"` resolves the field's
/// type under the default name, `"name"` resolves it under the field's
/// identifier, and `"recursive"` fills the field's current value. Adding
/// `omitempty` leaves the field untouched when nothing is bound. Fields that
/// are not listed are never touched.
///
/// # Examples
///
/// ```
/// use fibre_di::{fill_struct, BindConfig, Registry};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Settings {
///   primary: Option<Arc<String>>,
///   port: Option<Arc<u16>>,
///   label: &'static str,
/// }
///
/// fill_struct!(Settings {
///   primary: "name",
///   port: "type,omitempty",
/// });
///
/// let registry = Registry::new();
/// registry
///   .bind_singleton(|| Arc::new(String::from("db-1")), BindConfig::named("primary"))
///   .unwrap();
///
/// let mut settings = Settings { label: "keep", ..Settings::default() };
/// registry.resolver().fill(&mut settings).unwrap();
///
/// assert_eq!(settings.primary.as_deref().map(String::as_str), Some("db-1"));
/// assert!(settings.port.is_none());
/// assert_eq!(settings.label, "keep");
/// ```
#[macro_export]
macro_rules! fill_struct {
    ($name:ident { $($field:ident : $tag:literal),* $(,)? }) => {
        impl $crate::Fill for $name {
            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn fill(&mut self, resolver: &$crate::Resolver) -> $crate::Result<()> {
                let plan = $crate::__private::plan::<Self>(&[
                    $((stringify!($field), $tag),)*
                ])?;
                let mut index = 0usize;
                $(
                    $crate::__private::apply(&mut self.$field, &plan[index], resolver)?;
                    index += 1;
                )*
                Ok(())
            }
        }

        impl $crate::Field for $name {
            fn fill_nested(
                &mut self,
                resolver: &$crate::Resolver,
            ) -> ::std::option::Option<$crate::Result<()>> {
                ::std::option::Option::Some($crate::Fill::fill(self, resolver))
            }
        }
    };
}

/// Builds an [`Override`](crate::Override) from an instance and the
/// abstractions it stands in for.
///
/// ```
/// use fibre_di::{satisfies, TypeKey};
/// use std::sync::Arc;
///
/// trait Database: Send + Sync {}
/// struct MySql;
/// impl Database for MySql {}
///
/// let built = satisfies!(Arc::new(MySql) => dyn Database);
/// assert!(built.satisfies(TypeKey::of::<dyn Database>()));
/// assert!(built.satisfies(TypeKey::of::<MySql>()));
/// ```
#[macro_export]
macro_rules! satisfies {
    ($instance:expr $(=> $($abstraction:ty),+ $(,)?)?) => {
        $crate::Override::of($instance)
            $($(.satisfies(|c| c as ::std::sync::Arc<$abstraction>))+)?
            .build()
    };
}
