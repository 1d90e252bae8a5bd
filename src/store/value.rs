//! Dynamic values held by the variable store.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::locator::{Service, ServiceLocator};
use crate::error::{BootstrapError, Result};

/// A value stored in a [`VariableStore`](super::VariableStore) or bound to
/// a module parameter.
///
/// Cloning is cheap: data is cloned, objects and locators are shared.
#[derive(Clone)]
pub enum Value {
    /// Plain data. JSON `null` is a stored value, not an absence.
    Data(serde_json::Value),
    /// An arbitrary shared object, retrieved by downcasting.
    Object(Service),
    /// A service locator; only ever stored under the reserved key.
    Locator(Arc<dyn ServiceLocator>),
}

impl Value {
    /// Wrap an arbitrary object.
    pub fn object<T: Any + Send + Sync>(object: T) -> Self {
        Self::Object(Arc::new(object))
    }

    /// Wrap a service locator.
    pub fn locator<L: ServiceLocator + 'static>(locator: L) -> Self {
        Self::Locator(Arc::new(locator))
    }

    /// The data, if this is a data value.
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// The locator, if this is a locator value.
    pub fn as_locator(&self) -> Option<&Arc<dyn ServiceLocator>> {
        match self {
            Self::Locator(locator) => Some(locator),
            _ => None,
        }
    }

    /// Downcast an object value to `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Object(object) => Arc::clone(object).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Deserialize a data value into `T`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not data or does not
    /// match `T`'s shape.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let data = self.as_data().ok_or_else(|| {
            BootstrapError::invalid(format!("expected a data value, found {}", self.kind()))
        })?;
        serde_json::from_value(data.clone()).map_err(|e| BootstrapError::invalid(e.to_string()))
    }

    /// Whether this is JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Data(serde_json::Value::Null))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Data(_) => "data",
            Self::Object(_) => "an object",
            Self::Locator(_) => "a service locator",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(data) => f.debug_tuple("Data").field(data).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
            Self::Locator(_) => f.write_str("Locator(..)"),
        }
    }
}

/// Data values compare by content; objects and locators by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Data(a), Self::Data(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Locator(a), Self::Locator(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Self::Data(data)
    }
}

impl From<Arc<dyn ServiceLocator>> for Value {
    fn from(locator: Arc<dyn ServiceLocator>) -> Self {
        Self::Locator(locator)
    }
}

macro_rules! impl_from_data {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Data(serde_json::Value::from(value))
                }
            }
        )*
    };
}

impl_from_data!(bool, i32, i64, u32, u64, f64, String, &str);
