//! Bootchain - a minimal application bootstrap chain.
//!
//! An application starts up by running a list of modules, in order, against
//! one shared [`VariableStore`] and one lazily detected [`Environment`].
//! Each module wraps a callable and resolves its arguments from the store,
//! the environment, or a [`ServiceLocator`] kept under the reserved `"di"`
//! variable.
//!
//! # Modules
//!
//! - [`config`] - Declarative chain configuration (YAML/JSON)
//! - [`environment`] - Environment labels and deferred detection
//! - [`error`] - Error types and result aliases
//! - [`module`] - Modules and argument binding
//! - [`runner`] - The bootstrap chain
//! - [`store`] - Variables, values, and service location
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bootchain::{spec, Bootstrap, Callable, Parameter, ServiceRegistry};
//! use serde_json::json;
//!
//! let mut chain = Bootstrap::init(json!({"port": 8080}), "production").unwrap();
//! chain
//!     .store_mut()
//!     .set_service_locator(Arc::new(ServiceRegistry::new().with_service("greeting", String::from("hi"))));
//!
//! chain
//!     .add_module(
//!         Callable::with_params([Parameter::store("store"), Parameter::new("port")], |mut args| {
//!             let port = args.data(1)?.as_i64().unwrap_or_default();
//!             args.store().set("address", format!("0.0.0.0:{port}"))?;
//!             Ok(())
//!         }),
//!         None,
//!     )
//!     .unwrap()
//!     .add_module(
//!         spec!["@greeting", "address", Callable::new(|mut args| {
//!             let greeting = args.object::<String>(0)?;
//!             let line = format!("{greeting} from {}", args.data(1)?.as_str().unwrap_or_default());
//!             args.store().set("banner", line)?;
//!             Ok(())
//!         })],
//!         Some("production".into()),
//!     )
//!     .unwrap();
//!
//! chain.execute().unwrap();
//! assert_eq!(
//!     chain.store().get("banner").unwrap().as_data().unwrap(),
//!     "hi from 0.0.0.0:8080"
//! );
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod module;
pub mod runner;
pub mod store;

pub use config::BootstrapConfig;
pub use environment::{Environment, EnvironmentInput};
pub use error::{BootstrapError, Result};
pub use module::{
    Arg, Arguments, Callable, Descriptor, Module, ModuleInput, ParamType, Parameter, SpecEntry,
};
pub use runner::Bootstrap;
pub use store::{ServiceLocator, ServiceRegistry, StoreInput, Value, VariableStore};
