//! Loosely typed environment input.

use super::detection::Detector;
use super::resolver::Environment;
use crate::error::{BootstrapError, Result};

/// Anything an [`Environment`] can be built from.
///
/// Shapes are checked when the environment is built, before any module runs.
#[derive(Default)]
pub enum EnvironmentInput {
    /// Use the default ([`Environment::DEVELOPMENT`]).
    #[default]
    Default,
    /// A fixed label.
    Name(String),
    /// A detector run on first use.
    Detector(Detector),
    /// A pre-built environment.
    Environment(Environment),
    /// Untyped data; must be a string or `null`.
    Data(serde_json::Value),
}

impl EnvironmentInput {
    /// Build the environment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank label or data that is neither
    /// a string nor `null`.
    pub fn into_environment(self) -> Result<Environment> {
        match self {
            Self::Default => Ok(Environment::default()),
            Self::Name(name) => Environment::of(name),
            Self::Detector(detector) => Ok(Environment::from_boxed_detector(detector)),
            Self::Environment(environment) => Ok(environment),
            Self::Data(serde_json::Value::Null) => Ok(Environment::default()),
            Self::Data(serde_json::Value::String(name)) => Environment::of(name),
            Self::Data(_) => Err(BootstrapError::invalid(
                "environment must be a string, a detector function, or an Environment",
            )),
        }
    }
}

impl From<&str> for EnvironmentInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for EnvironmentInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Detector> for EnvironmentInput {
    fn from(detector: Detector) -> Self {
        Self::Detector(detector)
    }
}

impl From<Environment> for EnvironmentInput {
    fn from(environment: Environment) -> Self {
        Self::Environment(environment)
    }
}

impl From<serde_json::Value> for EnvironmentInput {
    fn from(data: serde_json::Value) -> Self {
        Self::Data(data)
    }
}

impl<T: Into<EnvironmentInput>> From<Option<T>> for EnvironmentInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(Self::Default, Into::into)
    }
}
