//! Declarative bootstrap configuration.
//!
//! - Schema definitions in [`schema`]
//! - Parsing from YAML or JSON text in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use bootchain::BootstrapConfig;
//!
//! let config = BootstrapConfig::from_yaml("environment: test\nvariables:\n  debug: true\n").unwrap();
//! assert_eq!(config.environment.as_deref(), Some("test"));
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{parse_config, parse_config_json};
pub use schema::BootstrapConfig;
pub use validator::{validate, validate_config, ValidationError};

use crate::error::Result;

impl BootstrapConfig {
    /// Parse and validate a YAML configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed input and `InvalidArgument` if
    /// validation fails.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config = parse_config(content)?;
        validate(&config)?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed input and `InvalidArgument` if
    /// validation fails.
    pub fn from_json(content: &str) -> Result<Self> {
        let config = parse_config_json(content)?;
        validate(&config)?;
        Ok(config)
    }
}
