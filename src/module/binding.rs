//! Argument resolution.
//!
//! Two strategies bind a callable's arguments:
//!
//! - **Reflective**: walks the callable's declared parameters. Store- and
//!   environment-typed parameters get those objects; everything else is
//!   looked up by name in the store and in the service locator. A name
//!   present in both is an error rather than a silent precedence choice.
//! - **Specified**: walks an explicit descriptor list whose markers say
//!   where each value comes from, so no ambiguity can arise.

use std::sync::Arc;

use tracing::warn;

use super::callable::{Arg, ParamType, Parameter};
use super::descriptor::{Source, SpecialSlot};
use crate::error::{BootstrapError, Result};
use crate::store::{ServiceLocator, Value, VariableStore};

/// A validated specification entry.
#[derive(Debug, Clone)]
pub(crate) struct SpecifiedParam {
    pub(crate) name: String,
    pub(crate) source: Source,
    pub(crate) default: Option<Value>,
}

/// Bind arguments from declared parameters.
pub(crate) fn bind_reflective(
    params: &[Parameter],
    store: &VariableStore,
    locator: Option<&Arc<dyn ServiceLocator>>,
) -> Result<Vec<Arg>> {
    params
        .iter()
        .map(|param| match param.ty() {
            ParamType::Store => Ok(Arg::Store),
            ParamType::Environment => Ok(Arg::Environment),
            ParamType::Any | ParamType::Named(_) => resolve_by_name(param, store, locator),
        })
        .collect()
}

fn resolve_by_name(
    param: &Parameter,
    store: &VariableStore,
    locator: Option<&Arc<dyn ServiceLocator>>,
) -> Result<Arg> {
    let name = param.name();
    let service_locator = locator.filter(|locator| locator.has(name));

    match (store.get(name), service_locator) {
        (Some(_), Some(_)) => {
            warn!(
                "Parameter '{}' exists both as a variable and as a service",
                name
            );
            Err(BootstrapError::Ambiguous {
                parameter: name.to_string(),
            })
        }
        (Some(value), None) => Ok(Arg::Value(value.clone())),
        (None, Some(locator)) => Ok(Arg::Value(Value::Object(locator.get(name)?))),
        (None, None) => param
            .default_value()
            .cloned()
            .map(Arg::Value)
            .ok_or_else(|| unresolvable(name)),
    }
}

/// Bind arguments from an explicit specification.
pub(crate) fn bind_specified(
    params: &[SpecifiedParam],
    store: &VariableStore,
    locator: Option<&Arc<dyn ServiceLocator>>,
) -> Result<Vec<Arg>> {
    params
        .iter()
        .map(|param| match &param.source {
            Source::Special(SpecialSlot::Store) => Ok(Arg::Store),
            Source::Special(SpecialSlot::Environment) => Ok(Arg::Environment),
            Source::Special(SpecialSlot::Locator) => Ok(Arg::Locator(locator.cloned())),
            Source::Service(service) => {
                let locator = locator.ok_or_else(|| BootstrapError::MissingLocator {
                    parameter: param.name.clone(),
                })?;
                Ok(Arg::Value(Value::Object(locator.get(service)?)))
            }
            Source::Variable(name) => store
                .get(name)
                .or(param.default.as_ref())
                .cloned()
                .map(Arg::Value)
                .ok_or_else(|| unresolvable(name)),
        })
        .collect()
}

fn unresolvable(name: &str) -> BootstrapError {
    warn!("No value for parameter '{}'", name);
    BootstrapError::Unresolvable {
        parameter: name.to_string(),
    }
}
