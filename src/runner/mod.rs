//! Bootstrap chain execution.

pub mod bootstrap;

pub use bootstrap::Bootstrap;
