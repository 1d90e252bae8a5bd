//! Loosely typed store input.

use super::variables::{json_kind, VariableStore};
use crate::error::{BootstrapError, Result};

/// Anything a [`VariableStore`] can be built from.
#[derive(Debug, Default)]
pub enum StoreInput {
    /// An empty store.
    #[default]
    Empty,
    /// Initial variables; must be a JSON object or `null`.
    Data(serde_json::Value),
    /// A pre-built store.
    Store(VariableStore),
}

impl StoreInput {
    /// Build the store.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if data is neither an object nor `null`,
    /// or assigns a non-locator to the reserved key.
    pub fn into_store(self) -> Result<VariableStore> {
        match self {
            Self::Empty => Ok(VariableStore::new()),
            Self::Store(store) => Ok(store),
            Self::Data(data @ (serde_json::Value::Object(_) | serde_json::Value::Null)) => {
                VariableStore::from_json(data)
            }
            Self::Data(other) => Err(BootstrapError::invalid(format!(
                "store must be an object or a VariableStore, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<serde_json::Value> for StoreInput {
    fn from(data: serde_json::Value) -> Self {
        Self::Data(data)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for StoreInput {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::Data(serde_json::Value::Object(map))
    }
}

impl From<VariableStore> for StoreInput {
    fn from(store: VariableStore) -> Self {
        Self::Store(store)
    }
}

impl<T: Into<StoreInput>> From<Option<T>> for StoreInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(Self::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;
    use serde_json::json;

    #[test]
    fn empty_builds_empty_store() {
        assert!(StoreInput::default().into_store().unwrap().is_empty());
        assert!(StoreInput::from(None::<VariableStore>)
            .into_store()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn data_builds_store() {
        let store = StoreInput::from(json!({"a": 1})).into_store().unwrap();
        assert_eq!(store.get("a"), Some(&Value::from(1)));
    }

    #[test]
    fn scalar_data_is_rejected() {
        let err = StoreInput::from(json!(1)).into_store().unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidArgument { .. }));
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn prebuilt_store_is_kept() {
        let mut store = VariableStore::new();
        store.set("b", 5).unwrap();
        let built = StoreInput::from(store).into_store().unwrap();
        assert!(built.has("b"));
    }
}
