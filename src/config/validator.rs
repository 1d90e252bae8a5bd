//! Configuration validation rules.
//!
//! - `environment` and `environment_var` are mutually exclusive
//! - Neither may be blank

use crate::config::schema::BootstrapConfig;
use crate::error::{BootstrapError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.environment.is_some() && config.environment_var.is_some() {
        errors.push(ValidationError::new(
            "conflicting-environment",
            "'environment' and 'environment_var' cannot both be set",
        ));
    }

    if is_blank(config.environment.as_deref()) {
        errors.push(ValidationError::new(
            "blank-environment",
            "'environment' must not be blank",
        ));
    }

    if is_blank(config.environment_var.as_deref()) {
        errors.push(ValidationError::new(
            "blank-environment-var",
            "'environment_var' must not be blank",
        ));
    }

    errors
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().is_empty())
}

/// Validate and return a single error joining every message.
///
/// # Errors
///
/// Returns `InvalidArgument` if any rule fails.
pub fn validate(config: &BootstrapConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(BootstrapError::invalid(messages.join("; ")))
    }
}
