//! Configuration schema for a bootstrap chain.
//!
//! Maps the YAML/JSON configuration format onto the inputs a
//! [`Bootstrap`](crate::Bootstrap) is built from.

use serde::{Deserialize, Serialize};

use crate::environment::{env_var_detector, EnvironmentInput};
use crate::store::StoreInput;

/// Root configuration structure.
///
/// ```yaml
/// environment: staging        # fixed label, or
/// environment_var: APP_ENV    # detect the label from a variable
/// variables:
///   debug: false
///   database:
///     host: localhost
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Fixed environment label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Process environment variable to detect the label from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_var: Option<String>,

    /// Initial store variables, in file order
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub variables: serde_json::Map<String, serde_json::Value>,
}

impl BootstrapConfig {
    /// The environment this config describes.
    ///
    /// A fixed label wins over detection; with neither, the default applies.
    /// Call [`validate`](super::validate) first to reject configs that set both.
    pub fn environment_input(&self) -> EnvironmentInput {
        match (&self.environment, &self.environment_var) {
            (Some(name), _) => EnvironmentInput::Name(name.clone()),
            (None, Some(var)) => EnvironmentInput::Detector(env_var_detector(var.clone())),
            (None, None) => EnvironmentInput::Default,
        }
    }

    /// The store contents this config describes.
    pub fn store_input(&self) -> StoreInput {
        StoreInput::Data(serde_json::Value::Object(self.variables.clone()))
    }
}
