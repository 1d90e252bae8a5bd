//! Shared variable store.

use std::sync::Arc;

use indexmap::IndexMap;

use super::locator::ServiceLocator;
use super::value::Value;
use crate::error::{BootstrapError, Result};

/// Reserved variable name holding the service locator.
pub const RESERVED_LOCATOR_KEY: &str = "di";

/// Insertion-ordered variables shared by every module of a chain.
///
/// Presence is key existence: a stored JSON `null` is present, a deleted
/// or never-set name is not. The reserved [`RESERVED_LOCATOR_KEY`] only
/// accepts a service locator.
///
/// # Example
///
/// ```
/// use bootchain::{ServiceRegistry, Value, VariableStore};
///
/// let mut store = VariableStore::new();
/// store.set("port", 8080).unwrap();
/// assert_eq!(store.get("port"), Some(&Value::from(8080)));
///
/// // The reserved key only takes a locator
/// assert!(store.set("di", "not a locator").is_err());
/// store.set("di", Value::locator(ServiceRegistry::new())).unwrap();
/// assert!(store.service_locator().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    variables: IndexMap<String, Value>,
}

impl VariableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from JSON data.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `data` is an object or `null`.
    pub fn from_json(data: serde_json::Value) -> Result<Self> {
        let mut store = Self::new();
        store.merge_json(data)?;
        Ok(store)
    }

    /// Get a variable. Unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Set a variable, replacing any previous value in place.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is the reserved key and `value`
    /// is not a service locator.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        let value = value.into();

        if name == RESERVED_LOCATOR_KEY {
            return match value {
                Value::Locator(locator) => {
                    self.set_service_locator(locator);
                    Ok(())
                }
                _ => Err(BootstrapError::invalid(format!(
                    "variable \"{}\" must hold a service locator",
                    RESERVED_LOCATOR_KEY
                ))),
            };
        }

        self.variables.insert(name, value);
        Ok(())
    }

    /// Whether a variable exists.
    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Remove a variable, keeping the order of the remaining ones.
    pub fn delete(&mut self, name: &str) -> Option<Value> {
        self.variables.shift_remove(name)
    }

    /// Store the service locator under the reserved key.
    pub fn set_service_locator(&mut self, locator: Arc<dyn ServiceLocator>) {
        self.variables
            .insert(RESERVED_LOCATOR_KEY.to_string(), Value::Locator(locator));
    }

    /// The service locator, if one is stored.
    pub fn service_locator(&self) -> Option<Arc<dyn ServiceLocator>> {
        self.get(RESERVED_LOCATOR_KEY)
            .and_then(Value::as_locator)
            .cloned()
    }

    /// Apply [`set`](Self::set) for each entry, in order.
    ///
    /// Stops at the first rejected entry; entries before it stay applied.
    pub fn merge_from<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in entries {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Merge a JSON object into the store.
    ///
    /// `null` merges nothing. Any other non-object is rejected.
    pub fn merge_json(&mut self, data: serde_json::Value) -> Result<()> {
        match data {
            serde_json::Value::Null => Ok(()),
            serde_json::Value::Object(map) => self.merge_from(map),
            other => Err(BootstrapError::invalid(format!(
                "store data must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Variable names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of variables, including the locator slot.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ServiceRegistry;
    use serde_json::json;

    #[test]
    fn set_then_get() {
        let mut store = VariableStore::new();
        store.set("a", 1).unwrap();
        store.set("b", true).unwrap();
        assert_eq!(store.get("a"), Some(&Value::from(1)));
        assert_eq!(store.get("b"), Some(&Value::from(true)));
        assert!(store.has("a"));
        assert!(store.has("b"));
    }

    #[test]
    fn unknown_name_is_absent() {
        let store = VariableStore::new();
        assert!(store.get("d").is_none());
        assert!(!store.has("d"));
    }

    #[test]
    fn null_is_present() {
        let mut store = VariableStore::new();
        store.set("c", json!(null)).unwrap();
        assert!(store.has("c"));
        assert!(store.get("c").unwrap().is_null());
    }

    #[test]
    fn last_write_wins_and_keeps_position() {
        let mut store = VariableStore::new();
        store.set("a", 1).unwrap();
        store.set("b", 2).unwrap();
        store.set("a", 3).unwrap();
        assert_eq!(store.get("a"), Some(&Value::from(3)));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn delete_removes_variable() {
        let mut store = VariableStore::new();
        store.set("a", 1).unwrap();
        store.set("b", 2).unwrap();
        store.set("c", 3).unwrap();

        assert_eq!(store.delete("b"), Some(Value::from(2)));
        assert!(!store.has("b"));
        assert!(store.get("b").is_none());
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(store.delete("b"), None);
    }

    #[test]
    fn reserved_key_rejects_non_locator() {
        let mut store = VariableStore::new();
        assert!(matches!(
            store.set(RESERVED_LOCATOR_KEY, "foo"),
            Err(BootstrapError::InvalidArgument { .. })
        ));
        assert!(store.set("di", Value::object(5u8)).is_err());
        assert!(!store.has("di"));
    }

    #[test]
    fn reserved_key_accepts_locator() {
        let mut store = VariableStore::new();
        store
            .set("di", Value::locator(ServiceRegistry::new()))
            .unwrap();

        assert!(store.get("di").unwrap().as_locator().is_some());
        assert!(store.service_locator().is_some());
    }

    #[test]
    fn generic_and_dedicated_accessors_share_locator() {
        let mut store = VariableStore::new();
        let locator: Arc<dyn ServiceLocator> =
            Arc::new(ServiceRegistry::new().with_service("x", 1u8));
        store.set_service_locator(Arc::clone(&locator));

        let via_get = store.get("di").unwrap().as_locator().unwrap().clone();
        let via_accessor = store.service_locator().unwrap();
        assert!(Arc::ptr_eq(&via_get, &locator));
        assert!(Arc::ptr_eq(&via_accessor, &locator));
    }

    #[test]
    fn deleting_locator_clears_accessor() {
        let mut store = VariableStore::new();
        store.set_service_locator(Arc::new(ServiceRegistry::new()));
        store.delete("di");
        assert!(store.service_locator().is_none());
    }

    #[test]
    fn merge_applies_in_order() {
        let mut store = VariableStore::new();
        store
            .merge_from(vec![("a", Value::from(1)), ("b", Value::from(2))])
            .unwrap();
        store.merge_from([("c", json!(null))]).unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn merge_keeps_reserved_key_check() {
        let mut store = VariableStore::new();
        let result = store.merge_from(vec![("a", Value::from(1)), ("di", Value::from("x"))]);
        assert!(matches!(result, Err(BootstrapError::InvalidArgument { .. })));
        assert!(store.has("a"));
        assert!(!store.has("di"));
    }

    #[test]
    fn from_json_object() {
        let store = VariableStore::from_json(json!({"a": 1, "b": true})).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b"), Some(&Value::from(true)));
    }

    #[test]
    fn from_json_null_is_empty() {
        assert!(VariableStore::from_json(json!(null)).unwrap().is_empty());
    }

    #[test]
    fn from_json_rejects_non_object() {
        for data in [json!(1), json!("a"), json!([1, 2]), json!(false)] {
            assert!(matches!(
                VariableStore::from_json(data),
                Err(BootstrapError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn from_json_rejects_reserved_data() {
        assert!(VariableStore::from_json(json!({"di": "foo"})).is_err());
    }
}
