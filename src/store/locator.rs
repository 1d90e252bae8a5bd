//! Service locator capability.
//!
//! The bootstrap core only consumes a locator through [`ServiceLocator`].
//! [`ServiceRegistry`] is a small in-memory implementation for applications
//! without their own container.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{BootstrapError, Result};

/// A shared service instance.
pub type Service = Arc<dyn Any + Send + Sync>;

type Factory = Box<dyn Fn() -> anyhow::Result<Service> + Send + Sync>;

/// A name-indexed provider of shared services.
pub trait ServiceLocator: Send + Sync {
    /// Whether a service is registered under `name`.
    fn has(&self, name: &str) -> bool;

    /// Fetch the service registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownService` if nothing is registered under `name`.
    fn get(&self, name: &str) -> Result<Service>;
}

impl std::fmt::Debug for dyn ServiceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ServiceLocator")
    }
}

impl<L: ServiceLocator + ?Sized> ServiceLocator for Arc<L> {
    fn has(&self, name: &str) -> bool {
        (**self).has(name)
    }

    fn get(&self, name: &str) -> Result<Service> {
        (**self).get(name)
    }
}

/// In-memory service locator.
///
/// Services are either registered as shared instances or as factories.
/// A factory runs on first `get` and its result is shared afterwards.
///
/// # Example
///
/// ```
/// use bootchain::{ServiceLocator, ServiceRegistry};
///
/// let registry = ServiceRegistry::new()
///     .with_service("answer", 42u32)
///     .with_factory("greeting", || Ok(String::from("hello")));
///
/// assert!(registry.has("answer"));
/// let answer = registry.get("answer").unwrap();
/// assert_eq!(answer.downcast_ref::<u32>(), Some(&42));
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    instances: Mutex<HashMap<String, Service>>,
    factories: HashMap<String, Factory>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance.
    pub fn set<T: Any + Send + Sync>(&mut self, name: impl Into<String>, service: T) {
        let name = name.into();
        self.factories.remove(&name);
        self.lock().insert(name, Arc::new(service));
    }

    /// Register a factory invoked on first use.
    pub fn set_factory<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> anyhow::Result<Service> + Send + Sync + 'static,
    {
        let name = name.into();
        self.lock().remove(&name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Builder form of [`set`](Self::set).
    pub fn with_service<T: Any + Send + Sync>(mut self, name: impl Into<String>, service: T) -> Self {
        self.set(name, service);
        self
    }

    /// Builder form of [`set_factory`](Self::set_factory) for a typed factory.
    pub fn with_factory<T, F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.set_factory(name, move || factory().map(|service| Arc::new(service) as Service));
        self
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        let instances = self.lock();
        instances.len()
            + self
                .factories
                .keys()
                .filter(|name| !instances.contains_key(*name))
                .count()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Service>> {
        // A poisoned map is still consistent: inserts are single operations.
        self.instances
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ServiceLocator for ServiceRegistry {
    fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name) || self.lock().contains_key(name)
    }

    fn get(&self, name: &str) -> Result<Service> {
        if let Some(service) = self.lock().get(name) {
            return Ok(Arc::clone(service));
        }

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BootstrapError::UnknownService {
                name: name.to_string(),
            })?;

        tracing::debug!("Constructing service '{}'", name);
        let service = factory().map_err(|e| {
            BootstrapError::Other(e.context(format!("failed to construct service '{}'", name)))
        })?;

        Ok(Arc::clone(
            self.lock()
                .entry(name.to_string())
                .or_insert_with(|| service),
        ))
    }
}
