//! Shared state for a bootstrap chain.
//!
//! - [`VariableStore`] - ordered variables shared by all modules
//! - [`Value`] - data, shared objects, or the service locator
//! - [`ServiceLocator`] - the service lookup capability modules consume
//! - [`ServiceRegistry`] - an in-memory locator
//! - [`StoreInput`] - the shapes a store can be built from

pub mod input;
pub mod locator;
pub mod value;
pub mod variables;

pub use input::StoreInput;
pub use locator::{Service, ServiceLocator, ServiceRegistry};
pub use value::Value;
pub use variables::{VariableStore, RESERVED_LOCATOR_KEY};
