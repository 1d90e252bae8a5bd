//! Explicit parameter specifications.
//!
//! A specification lists, in order, where each argument of a callable
//! comes from. Names carry their source in a leading marker:
//!
//! - `$container`, `$environment`, `$di` - the store, the environment,
//!   and the service locator (case-insensitive)
//! - `@name` - the service `name` from the locator
//! - anything else - the store variable of that name
//!
//! A descriptor may carry a default, used when a store variable is missing.

use crate::error::{BootstrapError, Result};
use crate::store::Value;

use super::callable::Callable;

/// Marker for special slots.
pub const SPECIAL_MARKER: char = '$';
/// Marker for locator services.
pub const SERVICE_MARKER: char = '@';

/// A special argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialSlot {
    /// `$container`
    Store,
    /// `$environment`
    Environment,
    /// `$di`
    Locator,
}

impl SpecialSlot {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "$container" => Some(Self::Store),
            "$environment" => Some(Self::Environment),
            "$di" => Some(Self::Locator),
            _ => None,
        }
    }
}

/// Where a specified argument comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Special(SpecialSlot),
    Service(String),
    Variable(String),
}

/// One entry of a specification: a name and an optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    name: String,
    default: Option<Value>,
}

impl Descriptor {
    /// A descriptor without a default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A descriptor with a default.
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Validate the name and classify its source.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank name, an unsupported `$` slot,
    /// or an `@` marker without a service name.
    pub fn source(&self, position: usize) -> Result<Source> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BootstrapError::invalid(format!(
                "invalid parameter name in position [{}], must be a non-blank string",
                position
            )));
        }

        if name.starts_with(SPECIAL_MARKER) {
            return SpecialSlot::parse(name).map(Source::Special).ok_or_else(|| {
                BootstrapError::invalid(format!("unsupported \"{}\" parameter", name))
            });
        }

        if let Some(service) = name.strip_prefix(SERVICE_MARKER) {
            let service = service.trim();
            if service.is_empty() {
                return Err(BootstrapError::invalid(format!(
                    "service parameter in position [{}] has no service name",
                    position
                )));
            }
            return Ok(Source::Service(service.to_string()));
        }

        Ok(Source::Variable(name.to_string()))
    }
}

impl From<&str> for Descriptor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Descriptor {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl<V: Into<Value>> From<(&str, V)> for Descriptor {
    fn from((name, default): (&str, V)) -> Self {
        Self::with_default(name, default)
    }
}

/// An entry of the list form of a module specification.
///
/// The list holds parameter descriptors followed by the callable, which
/// must come last.
pub enum SpecEntry {
    Param(Descriptor),
    Callable(Callable),
}

impl From<Descriptor> for SpecEntry {
    fn from(descriptor: Descriptor) -> Self {
        Self::Param(descriptor)
    }
}

impl From<&str> for SpecEntry {
    fn from(name: &str) -> Self {
        Self::Param(Descriptor::new(name))
    }
}

impl<V: Into<Value>> From<(&str, V)> for SpecEntry {
    fn from(pair: (&str, V)) -> Self {
        Self::Param(pair.into())
    }
}

impl From<Callable> for SpecEntry {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

/// Build a specification list from mixed entries.
///
/// ```
/// use bootchain::{spec, Callable};
///
/// let entries = spec!["$container", "@router", ("debug", false), Callable::new(|_| Ok(()))];
/// assert_eq!(entries.len(), 4);
/// ```
#[macro_export]
macro_rules! spec {
    ($($entry:expr),* $(,)?) => {
        vec![$($crate::module::SpecEntry::from($entry)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_slots_are_case_insensitive() {
        assert_eq!(
            Descriptor::new("$Container").source(0).unwrap(),
            Source::Special(SpecialSlot::Store)
        );
        assert_eq!(
            Descriptor::new("$ENVIRONMENT").source(0).unwrap(),
            Source::Special(SpecialSlot::Environment)
        );
        assert_eq!(
            Descriptor::new("$di").source(0).unwrap(),
            Source::Special(SpecialSlot::Locator)
        );
    }

    #[test]
    fn unknown_special_slot_is_rejected() {
        let err = Descriptor::new("$unknown").source(0).unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidArgument { .. }));
        assert!(err.to_string().contains("$unknown"));
    }

    #[test]
    fn service_marker_strips_prefix() {
        assert_eq!(
            Descriptor::new("@router").source(0).unwrap(),
            Source::Service("router".into())
        );
    }

    #[test]
    fn bare_service_marker_is_rejected() {
        assert!(Descriptor::new("@").source(3).is_err());
    }

    #[test]
    fn plain_name_is_variable() {
        assert_eq!(
            Descriptor::new(" a ").source(0).unwrap(),
            Source::Variable("a".into())
        );
    }

    #[test]
    fn blank_name_reports_position() {
        let err = Descriptor::new("  ").source(4).unwrap_err();
        assert!(err.to_string().contains("[4]"));
    }

    #[test]
    fn pair_carries_default() {
        let descriptor = Descriptor::from(("b", true));
        assert_eq!(descriptor.name(), "b");
        assert_eq!(descriptor.default_value(), Some(&Value::from(true)));
        assert!(Descriptor::from("a").default_value().is_none());
    }

    #[test]
    fn spec_macro_builds_entries() {
        let entries = crate::spec!["a", ("b", 1), Callable::new(|_| Ok(()))];
        assert!(matches!(entries[0], SpecEntry::Param(_)));
        assert!(matches!(entries[1], SpecEntry::Param(_)));
        assert!(matches!(entries[2], SpecEntry::Callable(_)));
    }
}
