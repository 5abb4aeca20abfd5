//! Service registry.
//!
//! Stores contract→implementation bindings keyed by `TypeId`, with an
//! explicit [`Lifetime`] per binding. Contracts are trait objects resolved as
//! `Arc<dyn Trait>`; concrete types work the same way through `Arc<T>`.
//!
//! The registry is populated once by the application's composition root and
//! is read-only afterwards, so resolution takes `&self` and needs no locking.
//! Resolving a contract that was never registered is a hard error
//! ([`FrameworkError::ServiceNotFound`]) surfaced to the caller at first use.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = Registry::new();
//! registry.register::<dyn PostRepository, _>(Lifetime::Transient, move || {
//!     Arc::new(DbPostRepository::new(db.scope()))
//! });
//!
//! let posts: Arc<dyn PostRepository> = registry.resolve()?;
//! ```

use crate::error::FrameworkError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// How instances are produced for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// A fresh instance for every resolution. No state is shared across
    /// logical requests.
    Transient,
    /// One shared instance for the lifetime of the process.
    Singleton,
}

enum Binding {
    Instance(Arc<dyn Any + Send + Sync>),
    Factory(Box<dyn Fn() -> Arc<dyn Any + Send + Sync> + Send + Sync>),
}

/// Contract→implementation registry with per-binding lifetimes.
///
/// One registration per contract: registering the same contract twice
/// replaces the earlier binding.
pub struct Registry {
    bindings: HashMap<TypeId, Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Register a contract with a factory and a lifetime.
    ///
    /// For [`Lifetime::Singleton`] the factory runs once, eagerly; for
    /// [`Lifetime::Transient`] it runs on every resolution.
    pub fn register<T, F>(&mut self, lifetime: Lifetime, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        // Bindings are stored under TypeId of Arc<T>, which works uniformly
        // for trait objects and concrete types.
        let type_id = TypeId::of::<Arc<T>>();
        let binding = match lifetime {
            Lifetime::Singleton => Binding::Instance(Arc::new(factory())),
            Lifetime::Transient => Binding::Factory(Box::new(move || {
                Arc::new(factory()) as Arc<dyn Any + Send + Sync>
            })),
        };
        self.bindings.insert(type_id, binding);
    }

    /// Register an already-built shared instance.
    pub fn register_instance<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        self.bindings
            .insert(TypeId::of::<Arc<T>>(), Binding::Instance(Arc::new(instance)));
    }

    /// Resolve a contract. Missing registrations surface as a fatal
    /// construction error at the call site, never silently.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, FrameworkError> {
        let binding = self
            .bindings
            .get(&TypeId::of::<Arc<T>>())
            .ok_or_else(FrameworkError::service_not_found::<T>)?;
        let erased = match binding {
            Binding::Instance(instance) => instance.clone(),
            Binding::Factory(factory) => factory(),
        };
        erased
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(FrameworkError::service_not_found::<T>)
    }

    /// Whether a contract has a registration.
    pub fn has<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<Arc<T>>())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Send + Sync + std::fmt::Debug {
        fn greet(&self) -> String;
    }

    #[derive(Debug)]
    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[derive(Debug)]
    struct French;
    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    #[test]
    fn transient_bindings_yield_a_fresh_instance_per_resolution() {
        let mut registry = Registry::new();
        registry.register::<dyn Greeter, _>(Lifetime::Transient, || Arc::new(English));

        let a = registry.resolve::<dyn Greeter>().unwrap();
        let b = registry.resolve::<dyn Greeter>().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.greet(), "hello");
    }

    #[test]
    fn singleton_bindings_share_one_instance() {
        let mut registry = Registry::new();
        registry.register::<dyn Greeter, _>(Lifetime::Singleton, || Arc::new(English));

        let a = registry.resolve::<dyn Greeter>().unwrap();
        let b = registry.resolve::<dyn Greeter>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn transient_factory_runs_every_time() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        let mut registry = Registry::new();
        registry.register::<dyn Greeter, _>(Lifetime::Transient, || {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Arc::new(English)
        });

        let before = BUILT.load(Ordering::SeqCst);
        let _ = registry.resolve::<dyn Greeter>().unwrap();
        let _ = registry.resolve::<dyn Greeter>().unwrap();
        assert_eq!(BUILT.load(Ordering::SeqCst) - before, 2);
    }

    #[test]
    fn missing_registration_is_an_error_not_a_silent_none() {
        let registry = Registry::new();
        let err = registry.resolve::<dyn Greeter>().unwrap_err();
        assert!(matches!(err, FrameworkError::ServiceNotFound { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn re_registration_replaces_the_earlier_binding() {
        let mut registry = Registry::new();
        registry.register::<dyn Greeter, _>(Lifetime::Transient, || Arc::new(English));
        registry.register::<dyn Greeter, _>(Lifetime::Transient, || Arc::new(French));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve::<dyn Greeter>().unwrap().greet(), "bonjour");
    }

    #[test]
    fn concrete_instances_resolve_through_the_same_api() {
        #[derive(Debug, PartialEq)]
        struct SiteName(String);

        let mut registry = Registry::new();
        registry.register_instance(Arc::new(SiteName("blog".to_string())));
        let name = registry.resolve::<SiteName>().unwrap();
        assert_eq!(*name, SiteName("blog".to_string()));
    }
}
