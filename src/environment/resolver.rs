//! Lazily resolved environment label.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use super::detection::{self, Detector};
use crate::error::{BootstrapError, Result};

enum State {
    Resolved(String),
    Pending(Detector),
    Failed(String),
    /// The detector is currently running.
    Detecting,
}

/// The environment the application is running under.
///
/// An `Environment` is immutable from the outside: once a label has been
/// produced, directly or through the detector, it never changes. A failed
/// detection is memoized as well, so the detector is invoked at most once.
///
/// # Example
///
/// ```
/// use bootchain::Environment;
///
/// let environment = Environment::of("Staging").unwrap();
/// assert!(environment.is("staging").unwrap());
/// assert!(environment.is(" STAGING ").unwrap());
/// assert!(!environment.is(Environment::PRODUCTION).unwrap());
/// ```
pub struct Environment {
    state: RefCell<State>,
}

/// Something an [`Environment`] can be compared against.
#[derive(Clone, Copy)]
pub enum EnvironmentRef<'a> {
    /// A raw label.
    Name(&'a str),
    /// Another environment, resolved before comparison.
    Environment(&'a Environment),
}

impl<'a> From<&'a str> for EnvironmentRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for EnvironmentRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

impl<'a> From<&'a Environment> for EnvironmentRef<'a> {
    fn from(environment: &'a Environment) -> Self {
        Self::Environment(environment)
    }
}

impl Environment {
    /// Development environment, e.g. a local developer machine.
    pub const DEVELOPMENT: &'static str = "development";
    /// Test environment shared by QA and developers.
    pub const TEST: &'static str = "test";
    /// Staging, pre-release environment.
    pub const STAGING: &'static str = "staging";
    /// Production environment.
    pub const PRODUCTION: &'static str = "production";

    /// Create an environment with a fixed label.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the label is blank after trimming.
    pub fn of(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(BootstrapError::invalid("environment name must not be blank"));
        }

        Ok(Self {
            state: RefCell::new(State::Resolved(name.to_string())),
        })
    }

    /// Create an environment whose label is produced by `detector` on first use.
    pub fn from_detector<F>(detector: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<String> + 'static,
    {
        Self::from_boxed_detector(Box::new(detector))
    }

    /// Create an environment from an already boxed detector.
    pub fn from_boxed_detector(detector: Detector) -> Self {
        Self {
            state: RefCell::new(State::Pending(detector)),
        }
    }

    /// Create an environment detected from a process environment variable.
    pub fn from_env_var(var: impl Into<String>) -> Self {
        Self::from_boxed_detector(detection::env_var_detector(var))
    }

    /// Test whether the application is running under `other`.
    ///
    /// Triggers detection if the label has not been resolved yet. When
    /// `other` is an environment, it is resolved as well.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `other` is a blank string, and
    /// `Detection` if either environment's detector failed.
    pub fn is<'a>(&self, other: impl Into<EnvironmentRef<'a>>) -> Result<bool> {
        let expected = match other.into() {
            EnvironmentRef::Name(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(BootstrapError::invalid(
                        "environment to compare against must not be blank",
                    ));
                }
                name.to_string()
            }
            EnvironmentRef::Environment(environment) => environment.resolve()?,
        };

        let current = self.resolve()?;
        Ok(current.eq_ignore_ascii_case(&expected))
    }

    /// The resolved label, running the detector if needed.
    pub fn name(&self) -> Result<String> {
        self.resolve()
    }

    /// Whether a label has been produced already.
    pub fn is_resolved(&self) -> bool {
        matches!(&*self.state.borrow(), State::Resolved(_))
    }

    /// The memoized detection failure, if detection was attempted and failed.
    pub fn detection_error(&self) -> Option<String> {
        match &*self.state.borrow() {
            State::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    fn resolve(&self) -> Result<String> {
        let detector = {
            let mut state = self.state.borrow_mut();
            match std::mem::replace(&mut *state, State::Detecting) {
                State::Pending(detector) => detector,
                State::Resolved(name) => {
                    *state = State::Resolved(name.clone());
                    return Ok(name);
                }
                State::Failed(message) => {
                    *state = State::Failed(message.clone());
                    return Err(BootstrapError::Detection { message });
                }
                State::Detecting => {
                    return Err(BootstrapError::Detection {
                        message: "environment detector re-entered its own environment".into(),
                    });
                }
            }
        };

        // The borrow is released while the detector runs.
        let _guard = DetectingGuard(&self.state);
        let outcome = detection::run(detector);

        let mut state = self.state.borrow_mut();
        match outcome {
            Ok(name) => {
                tracing::debug!("Detected environment '{}'", name);
                *state = State::Resolved(name.clone());
                Ok(name)
            }
            Err(message) => {
                *state = State::Failed(message.clone());
                Err(BootstrapError::Detection { message })
            }
        }
    }
}

/// Marks detection as failed if the detector unwinds.
struct DetectingGuard<'a>(&'a RefCell<State>);

impl Drop for DetectingGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.0.try_borrow_mut() {
            if matches!(*state, State::Detecting) {
                *state = State::Failed("environment detector function panicked".into());
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            state: RefCell::new(State::Resolved(Self::DEVELOPMENT.to_string())),
        }
    }
}

impl FromStr for Environment {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::of(s)
    }
}

/// Renders the label, running the detector if needed.
///
/// Rendering never fails: a detection failure is reported as a
/// `tracing` error event and the label renders as an empty string.
/// Use [`Environment::is`] or [`Environment::name`] to observe the error.
impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolve() {
            Ok(name) => f.write_str(&name),
            Err(e) => {
                tracing::error!("{}", e);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            State::Resolved(name) => f.debug_tuple("Environment").field(name).finish(),
            State::Pending(_) | State::Detecting => f.write_str("Environment(<pending>)"),
            State::Failed(message) => f
                .debug_struct("Environment")
                .field("error", message)
                .finish(),
        }
    }
}
