//! Bootstrap modules and argument resolution.
//!
//! A [`Module`] wraps one [`Callable`] and decides, each time it runs, which
//! values the callable receives:
//!
//! - [`Module::reflective`] binds from the callable's declared [`Parameter`]s
//! - [`Module::specified`] binds from an explicit [`Descriptor`] list
//! - [`Module::from_spec`] accepts the list form ending in the callable
//!
//! # Example
//!
//! ```
//! use bootchain::{Callable, Environment, Module, Parameter, VariableStore};
//!
//! let mut store = VariableStore::new();
//! store.set("name", "world").unwrap();
//!
//! let mut module = Module::reflective(Callable::with_params(
//!     [Parameter::store("store"), Parameter::new("name")],
//!     |mut args| {
//!         let greeting = format!("hello {}", args.data(1)?.as_str().unwrap_or_default());
//!         args.store().set("greeting", greeting)?;
//!         Ok(())
//!     },
//! ))
//! .unwrap();
//!
//! module.execute(&mut store, &Environment::default()).unwrap();
//! assert_eq!(store.get("greeting").unwrap().as_data().unwrap(), "hello world");
//! ```

pub mod binding;
pub mod callable;
pub mod descriptor;

pub use callable::{Arg, Arguments, Body, Callable, ParamType, Parameter};
pub use descriptor::{Descriptor, Source, SpecEntry, SpecialSlot, SERVICE_MARKER, SPECIAL_MARKER};

use std::fmt;

use tracing::debug;

use crate::environment::{Environment, EnvironmentInput};
use crate::error::{BootstrapError, Result};
use crate::store::VariableStore;

use binding::SpecifiedParam;

/// How a module binds its callable's arguments.
enum Binding {
    Reflective(Vec<Parameter>),
    Specified(Vec<SpecifiedParam>),
}

/// One optionally environment-gated unit of startup work.
pub struct Module {
    name: Option<String>,
    body: Body,
    binding: Binding,
    environment: Option<Environment>,
}

impl Module {
    /// A module binding arguments from the callable's declared parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the callable declares no parameter
    /// metadata or a parameter name is blank.
    pub fn reflective(callable: Callable) -> Result<Self> {
        let Callable { params, body } = callable;
        let params = params.ok_or_else(|| {
            BootstrapError::invalid(
                "callable declares no parameters to bind; declare them or supply a specification",
            )
        })?;

        if let Some(position) = params.iter().position(|p| p.name().trim().is_empty()) {
            return Err(BootstrapError::invalid(format!(
                "invalid parameter name in position [{}], must be a non-blank string",
                position
            )));
        }

        Ok(Self::with_binding(body, Binding::Reflective(params)))
    }

    /// A module binding arguments from an explicit specification.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a descriptor is malformed or the callable
    /// declares a different number of parameters than the descriptor list.
    pub fn specified<I, D>(descriptors: I, callable: Callable) -> Result<Self>
    where
        I: IntoIterator<Item = D>,
        D: Into<Descriptor>,
    {
        let params = descriptors
            .into_iter()
            .map(Into::<Descriptor>::into)
            .enumerate()
            .map(|(position, descriptor)| {
                Ok(SpecifiedParam {
                    source: descriptor.source(position)?,
                    name: descriptor.name().trim().to_string(),
                    default: descriptor.default_value().cloned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let Callable {
            params: declared,
            body,
        } = callable;
        if let Some(declared) = declared {
            if declared.len() != params.len() {
                return Err(BootstrapError::invalid(format!(
                    "specification lists {} parameters but the callable declares {}",
                    params.len(),
                    declared.len()
                )));
            }
        }

        Ok(Self::with_binding(body, Binding::Specified(params)))
    }

    /// A module from the list form: descriptors followed by the callable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the list is empty, does not end with
    /// the callable, or holds a callable anywhere else.
    pub fn from_spec(mut entries: Vec<SpecEntry>) -> Result<Self> {
        let callable = match entries.pop() {
            Some(SpecEntry::Callable(callable)) => callable,
            _ => {
                return Err(BootstrapError::invalid(
                    "the last element of a module specification must be the callable",
                ))
            }
        };

        let descriptors = entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| match entry {
                SpecEntry::Param(descriptor) => Ok(descriptor),
                SpecEntry::Callable(_) => Err(BootstrapError::invalid(format!(
                    "invalid parameter in position [{}]: only the last element may be a callable",
                    position
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::specified(descriptors, callable)
    }

    fn with_binding(body: Body, binding: Binding) -> Self {
        Self {
            name: None,
            body,
            binding,
            environment: None,
        }
    }

    /// Label the module for diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The module's label, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Only run this module under `environment`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a raw label is blank.
    pub fn set_environment(&mut self, environment: impl Into<EnvironmentInput>) -> Result<()> {
        self.environment = Some(environment.into().into_environment()?);
        Ok(())
    }

    /// Builder form of [`set_environment`](Self::set_environment).
    pub fn only_in(mut self, environment: impl Into<EnvironmentInput>) -> Result<Self> {
        self.set_environment(environment)?;
        Ok(self)
    }

    /// The gate environment, if set.
    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    /// Whether the module binds from declared parameters.
    pub fn is_reflective(&self) -> bool {
        matches!(self.binding, Binding::Reflective(_))
    }

    /// Number of arguments the callable receives.
    pub fn arity(&self) -> usize {
        match &self.binding {
            Binding::Reflective(params) => params.len(),
            Binding::Specified(params) => params.len(),
        }
    }

    /// Resolve the callable's arguments and invoke it.
    ///
    /// A module gated to a different environment returns without running.
    /// The callable's result value is discarded.
    ///
    /// # Errors
    ///
    /// Binding errors (`Unresolvable`, `Ambiguous`, `MissingLocator`,
    /// `UnknownService`), gate comparison errors, and the callable's own
    /// error wrapped in `Module`.
    pub fn execute(&mut self, store: &mut VariableStore, environment: &Environment) -> Result<()> {
        if let Some(gate) = &self.environment {
            if !environment.is(gate)? {
                debug!(
                    "Skipping module '{}': runs under '{}', current is '{}'",
                    self.label(),
                    gate,
                    environment
                );
                return Ok(());
            }
        }

        let locator = store.service_locator();
        let args = match &self.binding {
            Binding::Reflective(params) => {
                binding::bind_reflective(params, store, locator.as_ref())?
            }
            Binding::Specified(params) => {
                binding::bind_specified(params, store, locator.as_ref())?
            }
        };

        debug!("Running module '{}' with {} argument(s)", self.label(), args.len());
        (self.body)(Arguments::new(store, environment, args)).map_err(|source| {
            BootstrapError::Module {
                module: self.label().to_string(),
                source,
            }
        })
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("reflective", &self.is_reflective())
            .field("arity", &self.arity())
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// Anything [`Bootstrap::add_module`](crate::Bootstrap::add_module) accepts.
pub enum ModuleInput {
    /// A ready module.
    Module(Module),
    /// A callable bound reflectively.
    Callable(Callable),
    /// The list form: descriptors followed by the callable.
    Spec(Vec<SpecEntry>),
}

impl ModuleInput {
    /// Build the module.
    pub fn into_module(self) -> Result<Module> {
        match self {
            Self::Module(module) => Ok(module),
            Self::Callable(callable) => Module::reflective(callable),
            Self::Spec(entries) => Module::from_spec(entries),
        }
    }
}

impl From<Module> for ModuleInput {
    fn from(module: Module) -> Self {
        Self::Module(module)
    }
}

impl From<Callable> for ModuleInput {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

impl From<Vec<SpecEntry>> for ModuleInput {
    fn from(entries: Vec<SpecEntry>) -> Self {
        Self::Spec(entries)
    }
}

impl TryFrom<ModuleInput> for Module {
    type Error = BootstrapError;

    fn try_from(input: ModuleInput) -> Result<Self> {
        input.into_module()
    }
}
