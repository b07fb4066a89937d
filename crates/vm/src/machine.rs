//! Executor state: the registry it resolves calls against and the
//! diagnostic call stack.

use ember_common::Value;

use crate::error::Fault;
use crate::registry::Registry;

/// Names of the active functions, outermost first.
///
/// Purely diagnostic: it never affects control flow, and is attached to
/// an [`InterpretError`](crate::InterpretError) when a fault escapes.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    names: Vec<String>,
}

impl CallStack {
    /// Create an empty call stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entry into `name`.
    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Record exit from the innermost function.
    pub fn pop(&mut self) -> Result<String, Fault> {
        self.names.pop().ok_or(Fault::StackUnderflow)
    }

    /// Number of active functions.
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// Active function names, innermost last.
    pub fn snapshot(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Runs compiled functions against one registry.
///
/// Calls recurse on the host stack; there is no depth limit.
pub struct Executor<'r> {
    pub(crate) registry: &'r Registry,
    pub(crate) stack: CallStack,
}

impl<'r> Executor<'r> {
    /// Create an executor resolving calls through `registry`.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            stack: CallStack::new(),
        }
    }

    /// The diagnostic call stack. After a fault it still holds the
    /// functions that were active when the fault was raised.
    pub fn call_stack(&self) -> &CallStack {
        &self.stack
    }

    /// Invoke a native function, tracking it on the call stack.
    pub(crate) fn call_native(
        &mut self,
        key: &str,
        native: &dyn Fn(&[Value]) -> Result<Value, Fault>,
        args: &[Value],
    ) -> Result<Value, Fault> {
        self.stack.push(key);
        let result = native(args)?;
        self.stack.pop()?;
        Ok(result)
    }
}
