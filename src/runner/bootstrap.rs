//! Bootstrap chain orchestration.

use std::mem;

use tracing::{debug, warn};

use crate::config::{validate, BootstrapConfig};
use crate::environment::{Environment, EnvironmentInput};
use crate::error::Result;
use crate::module::{Module, ModuleInput};
use crate::store::{StoreInput, VariableStore};

/// An ordered, single-use chain of modules sharing one store and environment.
///
/// [`execute`](Self::execute) takes the queued modules before running them,
/// so whatever happens, a later call only runs modules added afterwards.
#[derive(Debug, Default)]
pub struct Bootstrap {
    modules: Vec<Module>,
    store: VariableStore,
    environment: Environment,
}

impl Bootstrap {
    /// An empty chain with an empty store and the development environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from loosely typed store and environment inputs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either input has the wrong shape or a
    /// label is blank.
    pub fn init(
        store: impl Into<StoreInput>,
        environment: impl Into<EnvironmentInput>,
    ) -> Result<Self> {
        Ok(Self {
            modules: Vec::new(),
            store: store.into().into_store()?,
            environment: environment.into().into_environment()?,
        })
    }

    /// Build a chain from a parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the configuration fails validation.
    pub fn from_config(config: &BootstrapConfig) -> Result<Self> {
        validate(config)?;
        Self::init(config.store_input(), config.environment_input())
    }

    /// Queue a module.
    ///
    /// Bare callables bind reflectively and descriptor lists bind as
    /// specified. A given `environment` replaces the module's own gate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the module cannot be built or the gate
    /// label is blank.
    pub fn add_module(
        &mut self,
        module: impl Into<ModuleInput>,
        environment: Option<EnvironmentInput>,
    ) -> Result<&mut Self> {
        let mut module = module.into().into_module()?;
        if let Some(environment) = environment {
            module.set_environment(environment)?;
        }
        self.modules.push(module);
        Ok(self)
    }

    /// Run every queued module in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first module failure. Modules after it do not run and
    /// are discarded with the rest of the queue.
    pub fn execute(&mut self) -> Result<&mut Self> {
        let modules = mem::take(&mut self.modules);
        let total = modules.len();
        debug!("Executing bootstrap chain with {} module(s)", total);

        for (index, mut module) in modules.into_iter().enumerate() {
            if let Err(e) = module.execute(&mut self.store, &self.environment) {
                warn!(
                    "Bootstrap aborted at module {} of {}: {}",
                    index + 1,
                    total,
                    e
                );
                return Err(e);
            }
        }

        debug!("Bootstrap chain finished");
        Ok(self)
    }

    /// The shared store.
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Mutable access to the shared store.
    pub fn store_mut(&mut self) -> &mut VariableStore {
        &mut self.store
    }

    /// Replace the shared store.
    pub fn set_store(&mut self, store: VariableStore) -> &mut Self {
        self.store = store;
        self
    }

    /// The chain's environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Replace the chain's environment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank label or wrong shape.
    pub fn set_environment(
        &mut self,
        environment: impl Into<EnvironmentInput>,
    ) -> Result<&mut Self> {
        self.environment = environment.into().into_environment()?;
        Ok(self)
    }

    /// Number of queued modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no modules are queued.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BootstrapError;
    use crate::module::{Callable, Parameter};
    use crate::spec;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn recorder(log: &Log, name: &'static str) -> Callable {
        let log = Rc::clone(log);
        Callable::nullary(move |_| {
            log.borrow_mut().push(name);
            Ok(())
        })
    }

    #[test]
    fn new_chain_is_empty_development() {
        let chain = Bootstrap::new();
        assert!(chain.is_empty());
        assert!(chain.store().is_empty());
        assert!(chain.environment().is(Environment::DEVELOPMENT).unwrap());
    }

    #[test]
    fn init_accepts_loose_inputs() {
        let chain = Bootstrap::init(json!({"a": 1}), "test").unwrap();
        assert!(chain.store().has("a"));
        assert!(chain.environment().is("test").unwrap());

        let chain = Bootstrap::init(None::<VariableStore>, None::<&str>).unwrap();
        assert!(chain.store().is_empty());
        assert!(chain.environment().is("development").unwrap());
    }

    #[test]
    fn init_rejects_wrong_shapes() {
        assert!(matches!(
            Bootstrap::init(json!("scalar"), "test"),
            Err(BootstrapError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Bootstrap::init(json!({}), json!(5)),
            Err(BootstrapError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Bootstrap::init(json!({}), ""),
            Err(BootstrapError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn executes_in_insertion_order() {
        let log = Log::default();
        let mut chain = Bootstrap::new();
        chain
            .add_module(recorder(&log, "first"), None)
            .unwrap()
            .add_module(recorder(&log, "second"), None)
            .unwrap()
            .add_module(recorder(&log, "third"), None)
            .unwrap();
        assert_eq!(chain.len(), 3);

        chain.execute().unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
        assert!(chain.is_empty());
    }

    #[test]
    fn second_execute_is_noop() {
        let log = Log::default();
        let mut chain = Bootstrap::new();
        chain.add_module(recorder(&log, "once"), None).unwrap();

        chain.execute().unwrap().execute().unwrap();
        assert_eq!(*log.borrow(), vec!["once"]);
    }

    #[test]
    fn failure_aborts_and_clears_chain() {
        let log = Log::default();
        let mut chain = Bootstrap::new();
        chain.add_module(recorder(&log, "first"), None).unwrap();
        chain
            .add_module(
                Callable::with_params([Parameter::new("missing")], |_| Ok(())),
                None,
            )
            .unwrap();
        chain.add_module(recorder(&log, "third"), None).unwrap();

        let err = chain.execute().unwrap_err();
        assert!(matches!(err, BootstrapError::Unresolvable { ref parameter } if parameter == "missing"));
        assert_eq!(*log.borrow(), vec!["first"]);
        assert!(chain.is_empty());

        chain.execute().unwrap();
        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn later_modules_see_earlier_writes() {
        let seen = Rc::new(RefCell::new(None));
        let mut chain = Bootstrap::new();
        chain
            .add_module(
                Callable::with_params([Parameter::store("store")], |mut args| {
                    args.store().set("port", 8080)?;
                    Ok(())
                }),
                None,
            )
            .unwrap();
        let captured = Rc::clone(&seen);
        chain
            .add_module(
                spec![
                    "port",
                    Callable::new(move |args| {
                        *captured.borrow_mut() = args.data(0)?.as_i64();
                        Ok(())
                    })
                ],
                None,
            )
            .unwrap();

        chain.execute().unwrap();
        assert_eq!(*seen.borrow(), Some(8080));
    }

    #[test]
    fn gate_skips_other_environments() {
        let log = Log::default();
        let mut chain = Bootstrap::init(json!({}), "staging").unwrap();
        chain
            .add_module(recorder(&log, "prod"), Some("production".into()))
            .unwrap()
            .add_module(recorder(&log, "staging"), Some("STAGING".into()))
            .unwrap()
            .add_module(recorder(&log, "always"), None)
            .unwrap();

        chain.execute().unwrap();
        assert_eq!(*log.borrow(), vec!["staging", "always"]);
    }

    #[test]
    fn add_module_gate_overrides_module_gate() {
        let log = Log::default();
        let module = Module::reflective(recorder(&log, "gated"))
            .unwrap()
            .only_in("production")
            .unwrap();

        let mut chain = Bootstrap::init(json!({}), "test").unwrap();
        chain.add_module(module, Some("test".into())).unwrap();
        chain.execute().unwrap();
        assert_eq!(*log.borrow(), vec!["gated"]);
    }

    #[test]
    fn add_module_rejects_blank_gate() {
        let log = Log::default();
        let mut chain = Bootstrap::new();
        assert!(chain
            .add_module(recorder(&log, "x"), Some("".into()))
            .is_err());
        assert!(chain.is_empty());
    }

    #[test]
    fn add_module_rejects_opaque_callable() {
        let mut chain = Bootstrap::new();
        let err = chain
            .add_module(Callable::new(|_| Ok(())), None)
            .unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidArgument { .. }));
    }

    #[test]
    fn from_config_builds_chain() {
        let config = BootstrapConfig::from_yaml("environment: test\nvariables:\n  a: 1\n").unwrap();
        let chain = Bootstrap::from_config(&config).unwrap();
        assert!(chain.environment().is("test").unwrap());
        assert!(chain.store().has("a"));
    }

    #[test]
    fn from_config_rejects_conflicting_environment() {
        let config = BootstrapConfig {
            environment: Some("test".into()),
            environment_var: Some("APP_ENV".into()),
            ..Default::default()
        };
        assert!(Bootstrap::from_config(&config).is_err());
    }

    #[test]
    fn setters_replace_state() {
        let mut store = VariableStore::new();
        store.set("k", "v").unwrap();

        let mut chain = Bootstrap::new();
        chain.set_store(store).set_environment("test").unwrap();
        assert!(chain.store().has("k"));
        assert!(chain.environment().is("test").unwrap());

        chain.store_mut().delete("k");
        assert!(!chain.store().has("k"));
        assert!(chain.set_environment("  ").is_err());
    }
}
