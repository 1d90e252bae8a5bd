//! Configuration parsing.
//!
//! Configuration is parsed from in-memory text; reading files is left to
//! the application.

use crate::config::schema::BootstrapConfig;
use crate::error::{BootstrapError, Result};

/// Parse YAML content into a [`BootstrapConfig`].
///
/// # Errors
///
/// Returns `ConfigParse` if the YAML is invalid or has the wrong shape.
pub fn parse_config(content: &str) -> Result<BootstrapConfig> {
    if content.trim().is_empty() {
        return Ok(BootstrapConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| BootstrapError::ConfigParse {
        message: e.to_string(),
    })
}

/// Parse JSON content into a [`BootstrapConfig`].
///
/// # Errors
///
/// Returns `ConfigParse` if the JSON is invalid or has the wrong shape.
pub fn parse_config_json(content: &str) -> Result<BootstrapConfig> {
    serde_json::from_str(content).map_err(|e| BootstrapError::ConfigParse {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_yaml() {
        let config = parse_config(
            r#"
environment: staging
variables:
  debug: true
  database:
    host: localhost
    port: 5432
"#,
        )
        .unwrap();

        assert_eq!(config.environment.as_deref(), Some("staging"));
        assert_eq!(config.variables["debug"], json!(true));
        assert_eq!(config.variables["database"]["port"], json!(5432));
    }

    #[test]
    fn yaml_preserves_variable_order() {
        let config = parse_config("variables:\n  z: 1\n  a: 2\n  m: 3\n").unwrap();
        let keys: Vec<_> = config.variables.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(parse_config("  \n").unwrap(), BootstrapConfig::default());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let err = parse_config("variables: [unclosed").unwrap_err();
        assert!(matches!(err, BootstrapError::ConfigParse { .. }));
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        let err = parse_config("variables: 5").unwrap_err();
        assert!(matches!(err, BootstrapError::ConfigParse { .. }));
    }

    #[test]
    fn parses_json() {
        let config =
            parse_config_json(r#"{"environment_var": "APP_ENV", "variables": {"a": 1}}"#).unwrap();
        assert_eq!(config.environment_var.as_deref(), Some("APP_ENV"));
        assert_eq!(config.variables["a"], json!(1));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            parse_config_json("{"),
            Err(BootstrapError::ConfigParse { .. })
        ));
    }
}
