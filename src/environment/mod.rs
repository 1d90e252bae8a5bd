//! Runtime environment label.
//!
//! An [`Environment`] names the context the application starts under
//! (development, test, staging, production, or anything else). It is
//! either fixed at construction or produced lazily by a detector:
//!
//! 1. A fixed label, trimmed and validated up front
//! 2. A detector closure, run once on first use and memoized
//! 3. A detector reading a process environment variable
//!
//! Comparison is case-insensitive and ignores surrounding whitespace.

pub mod detection;
pub mod input;
pub mod resolver;

pub use detection::{detect_with_env, env_var_detector, Detector};
pub use input::EnvironmentInput;
pub use resolver::{Environment, EnvironmentRef};
