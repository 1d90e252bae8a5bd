//! Module callables and their parameter metadata.
//!
//! Rust closures carry no runtime parameter information, so a callable
//! that wants reflective binding declares its parameters explicitly with
//! [`Parameter`]. The callable itself receives the bound values through
//! [`Arguments`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::environment::Environment;
use crate::error::{BootstrapError, Result};
use crate::store::{ServiceLocator, Value, VariableStore};

/// The declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParamType {
    /// No type annotation.
    #[default]
    Any,
    /// The chain's variable store.
    Store,
    /// The chain's environment.
    Environment,
    /// Any other annotation. Informational only; binding is by name.
    Named(String),
}

/// One declared parameter of a callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    ty: ParamType,
    default: Option<Value>,
}

impl Parameter {
    /// An untyped parameter without a default. The name is trimmed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            ty: ParamType::Any,
            default: None,
        }
    }

    /// A parameter typed as the variable store.
    pub fn store(name: impl Into<String>) -> Self {
        Self::new(name).typed(ParamType::Store)
    }

    /// A parameter typed as the environment.
    pub fn environment(name: impl Into<String>) -> Self {
        Self::new(name).typed(ParamType::Environment)
    }

    /// Set the declared type.
    pub fn typed(mut self, ty: ParamType) -> Self {
        self.ty = ty;
        self
    }

    /// Set the default used when nothing else resolves.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The body of a module.
pub type Body = Box<dyn FnMut(Arguments<'_>) -> anyhow::Result<()>>;

/// A unit of startup work plus, optionally, its declared parameters.
pub struct Callable {
    pub(crate) params: Option<Vec<Parameter>>,
    pub(crate) body: Body,
}

impl Callable {
    /// A callable without parameter metadata.
    ///
    /// Such a callable can only be used with an explicit specification.
    pub fn new<F>(body: F) -> Self
    where
        F: FnMut(Arguments<'_>) -> anyhow::Result<()> + 'static,
    {
        Self {
            params: None,
            body: Box::new(body),
        }
    }

    /// A callable declaring its parameters.
    pub fn with_params<P, F>(params: P, body: F) -> Self
    where
        P: IntoIterator<Item = Parameter>,
        F: FnMut(Arguments<'_>) -> anyhow::Result<()> + 'static,
    {
        Self {
            params: Some(params.into_iter().collect()),
            body: Box::new(body),
        }
    }

    /// A callable declaring that it takes no parameters.
    pub fn nullary<F>(body: F) -> Self
    where
        F: FnMut(Arguments<'_>) -> anyhow::Result<()> + 'static,
    {
        Self::with_params(Vec::new(), body)
    }

    /// Declared parameters, if any were declared.
    pub fn params(&self) -> Option<&[Parameter]> {
        self.params.as_deref()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// A bound argument.
#[derive(Debug, Clone)]
pub enum Arg {
    /// The variable store; reach it with [`Arguments::store`].
    Store,
    /// The environment; reach it with [`Arguments::environment`].
    Environment,
    /// The service locator, absent when the store holds none.
    Locator(Option<Arc<dyn ServiceLocator>>),
    /// A variable, service, or default value.
    Value(Value),
}

/// Arguments handed to a module body, in parameter order.
pub struct Arguments<'a> {
    store: &'a mut VariableStore,
    environment: &'a Environment,
    args: Vec<Arg>,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(
        store: &'a mut VariableStore,
        environment: &'a Environment,
        args: Vec<Arg>,
    ) -> Self {
        Self {
            store,
            environment,
            args,
        }
    }

    /// The shared variable store.
    pub fn store(&mut self) -> &mut VariableStore {
        self.store
    }

    /// The chain's environment.
    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    /// All arguments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.args.iter()
    }

    /// The value bound at `index`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `index` is out of range or the argument
    /// is the store, environment, or locator slot.
    pub fn value(&self, index: usize) -> Result<&Value> {
        match self.args.get(index) {
            Some(Arg::Value(value)) => Ok(value),
            Some(other) => Err(BootstrapError::invalid(format!(
                "argument {} is {:?}, not a value",
                index, other
            ))),
            None => Err(out_of_range(index, self.args.len())),
        }
    }

    /// The data bound at `index`.
    pub fn data(&self, index: usize) -> Result<&serde_json::Value> {
        self.value(index)?.as_data().ok_or_else(|| {
            BootstrapError::invalid(format!("argument {} is not a data value", index))
        })
    }

    /// The object bound at `index`, downcast to `T`.
    pub fn object<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        self.value(index)?.downcast::<T>().ok_or_else(|| {
            BootstrapError::invalid(format!(
                "argument {} is not an object of type {}",
                index,
                std::any::type_name::<T>()
            ))
        })
    }

    /// The data bound at `index`, deserialized into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        self.value(index)?.deserialize()
    }

    /// The locator bound at `index`.
    ///
    /// Accepts both the `$di` slot and a locator resolved by name.
    pub fn locator(&self, index: usize) -> Result<Option<Arc<dyn ServiceLocator>>> {
        match self.args.get(index) {
            Some(Arg::Locator(locator)) => Ok(locator.clone()),
            Some(Arg::Value(Value::Locator(locator))) => Ok(Some(Arc::clone(locator))),
            Some(other) => Err(BootstrapError::invalid(format!(
                "argument {} is {:?}, not a service locator",
                index, other
            ))),
            None => Err(out_of_range(index, self.args.len())),
        }
    }
}

fn out_of_range(index: usize, len: usize) -> BootstrapError {
    BootstrapError::invalid(format!(
        "argument {} requested but only {} were bound",
        index, len
    ))
}
