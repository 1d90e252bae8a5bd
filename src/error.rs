//! Error types for bootstrap operations.
//!
//! This module defines [`BootstrapError`], the error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Malformed construction input is rejected immediately with `InvalidArgument`
//! - Binding failures (`Unresolvable`, `Ambiguous`, `MissingLocator`) surface
//!   when a module runs, because they depend on the shared store at that time
//! - A module's own failure is wrapped in `Module` with the module's label
//! - Nothing is retried or swallowed: the first error aborts the chain

use thiserror::Error;

/// Core error type for bootstrap operations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Malformed input to a constructor or setter.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// No store value, service, or default exists for a parameter.
    #[error("Unable to resolve a value for the \"{parameter}\" parameter")]
    Unresolvable { parameter: String },

    /// A parameter name exists both in the store and in the service locator.
    #[error("Parameter name \"{parameter}\" is ambiguous")]
    Ambiguous { parameter: String },

    /// A service parameter was requested but the store holds no locator.
    #[error("No service locator exists in the store to resolve \"{parameter}\"")]
    MissingLocator { parameter: String },

    /// The service locator has no service under this name.
    #[error("Unknown service: {name}")]
    UnknownService { name: String },

    /// Environment detection failed or produced an invalid value.
    #[error("Unable to detect current environment: {message}")]
    Detection { message: String },

    /// Failed to parse bootstrap configuration.
    #[error("Failed to parse bootstrap config: {message}")]
    ConfigParse { message: String },

    /// A module callable returned an error.
    #[error("Module '{module}' failed: {source}")]
    Module {
        module: String,
        #[source]
        source: anyhow::Error,
    },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BootstrapError {
    /// Shorthand for an [`BootstrapError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
