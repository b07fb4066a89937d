//! Host-facing API: owns a registry, installs modules, runs packages.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use ember_common::{CompiledPackage, Value};
use tracing::{info, warn};

use crate::error::{Fault, InterpretError};
use crate::machine::Executor;
use crate::natives;
use crate::registry::{Binding, Registry};

/// Destination for `io:println`, shared with the host.
pub type SharedWriter = Rc<RefCell<dyn Write>>;

/// Callback run once against each new runtime's registry.
pub type ModuleInitializer = Box<dyn Fn(&mut Registry)>;

/// Name of the function [`Runtime::interpret`] runs after registration.
pub const ENTRY_FUNCTION: &str = "main";

/// Configures a [`Runtime`].
pub struct RuntimeBuilder {
    standard_modules: bool,
    output: Option<SharedWriter>,
    initializers: Vec<ModuleInitializer>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            standard_modules: true,
            output: None,
            initializers: Vec::new(),
        }
    }

    /// Whether to install the `io`, `lang.array` and `lang.int` modules. On by default.
    pub fn standard_modules(mut self, enabled: bool) -> Self {
        self.standard_modules = enabled;
        self
    }

    /// Where `io:println` writes. Standard output by default.
    pub fn output(mut self, output: SharedWriter) -> Self {
        self.output = Some(output);
        self
    }

    /// Run `initializer` against the registry after the standard modules.
    pub fn initializer(mut self, initializer: impl Fn(&mut Registry) + 'static) -> Self {
        self.initializers.push(Box::new(initializer));
        self
    }

    /// Build the runtime, running every module initializer once.
    pub fn build(self) -> Runtime {
        let mut registry = Registry::new();
        if self.standard_modules {
            let output = self
                .output
                .unwrap_or_else(|| Rc::new(RefCell::new(io::stdout())));
            natives::install_standard(&mut registry, output);
        }
        for initializer in &self.initializers {
            initializer(&mut registry);
        }
        Runtime { registry }
    }
}

/// One interpreter instance. Not `Send`: build one per thread.
#[derive(Debug)]
pub struct Runtime {
    registry: Registry,
}

impl Runtime {
    /// A runtime with the standard modules writing to standard output.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a runtime.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// The registry calls resolve against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for registering functions after construction.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Register every function of `package`.
    pub fn register_package(&mut self, package: CompiledPackage) {
        info!(
            org = %package.org,
            module = %package.module,
            functions = package.functions.len(),
            "package registered"
        );
        self.registry.register_package(package);
    }

    /// Register `package`, then run its `main` function if it has one.
    pub fn interpret(&mut self, package: CompiledPackage) -> Result<(), InterpretError> {
        let entry = package
            .function(ENTRY_FUNCTION)
            .map(|_| package.qualified_name(ENTRY_FUNCTION));
        self.register_package(package);
        match entry {
            Some(key) => self.call(&key, Vec::new()).map(|_| ()),
            None => {
                info!("package has no {ENTRY_FUNCTION} function; nothing to run");
                Ok(())
            }
        }
    }

    /// Invoke the function registered under `key` with `args`.
    pub fn call(&self, key: &str, args: Vec<Value>) -> Result<Value, InterpretError> {
        let mut executor = Executor::new(&self.registry);
        let result = match self.registry.resolve(key) {
            Ok(Binding::Compiled(function)) => executor.invoke(function, args),
            Ok(Binding::Native(native)) => executor.call_native(key, native.as_ref(), &args),
            Err(fault) => Err(fault),
        };
        result.map_err(|fault| report(fault, executor.call_stack().snapshot()))
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

fn report(fault: Fault, stack: Vec<String>) -> InterpretError {
    warn!(fault = %fault, stack = ?stack, "interpretation aborted");
    InterpretError { fault, stack }
}
