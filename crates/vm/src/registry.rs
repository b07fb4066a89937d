//! Function registry: qualified names to compiled or native functions.

use std::cell::Cell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ember_common::{qualified_name, CallSite, CompiledFunction, CompiledPackage, Value};
use tracing::debug;

use crate::error::Fault;

/// A host function callable from IR.
pub type NativeFunction = Rc<dyn Fn(&[Value]) -> Result<Value, Fault>>;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// What a function key resolves to.
#[derive(Clone)]
pub enum Binding {
    Compiled(Rc<CompiledFunction>),
    Native(NativeFunction),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Compiled(function) => write!(f, "Compiled({})", function.name),
            Binding::Native(_) => f.write_str("Native"),
        }
    }
}

/// Maps `org/module:name` keys, and bare-name aliases, to functions.
///
/// Compiled functions take precedence over natives registered under the
/// same key. Within each table the first registration of a key wins;
/// bindings are never replaced or removed, so call sites may cache them.
pub struct Registry {
    id: u64,
    bindings: Vec<Binding>,
    compiled: HashMap<String, usize>,
    natives: HashMap<String, usize>,
    lookups: Cell<u64>,
}

impl Registry {
    /// Create an empty registry with a process-unique id.
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            bindings: Vec::new(),
            compiled: HashMap::new(),
            natives: HashMap::new(),
            lookups: Cell::new(0),
        }
    }

    /// Identity used to tag call-site caches.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Register every function of `package` under its qualified and bare names.
    pub fn register_package(&mut self, package: CompiledPackage) {
        let CompiledPackage {
            org,
            module,
            functions,
        } = package;
        for function in functions {
            let key = qualified_name(&org, &module, &function.name);
            let bare = function.name.clone();
            let index = self.push(Binding::Compiled(Rc::new(function)));
            debug!(key = %key, "compiled function registered");
            claim(&mut self.compiled, key, index);
            claim(&mut self.compiled, bare, index);
        }
    }

    /// Register a native function under `org/module:name` and `name`.
    pub fn register_extern_function<F>(&mut self, org: &str, module: &str, name: &str, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, Fault> + 'static,
    {
        let key = qualified_name(org, module, name);
        let index = self.push(Binding::Native(Rc::new(function)));
        debug!(key = %key, "native function registered");
        claim(&mut self.natives, key, index);
        claim(&mut self.natives, name.to_string(), index);
    }

    fn push(&mut self, binding: Binding) -> usize {
        self.bindings.push(binding);
        self.bindings.len() - 1
    }

    /// Returns true if `key` names a compiled or native function.
    pub fn contains(&self, key: &str) -> bool {
        self.compiled.contains_key(key) || self.natives.contains_key(key)
    }

    /// Look up `key`: compiled functions first, then natives.
    pub fn resolve(&self, key: &str) -> Result<&Binding, Fault> {
        let index = self.lookup(key)?;
        Ok(&self.bindings[index])
    }

    fn lookup(&self, key: &str) -> Result<usize, Fault> {
        self.lookups.set(self.lookups.get() + 1);
        self.compiled
            .get(key)
            .or_else(|| self.natives.get(key))
            .copied()
            .ok_or_else(|| Fault::UnresolvedFunction {
                name: key.to_string(),
            })
    }

    /// Resolve the target of a call site, reusing the site's cached binding
    /// when this registry produced it.
    pub fn resolve_call(&self, site: &CallSite) -> Result<&Binding, Fault> {
        if let Some(binding) = site.cached(self.id).and_then(|i| self.bindings.get(i)) {
            return Ok(binding);
        }
        let index = self.lookup(&site.key)?;
        debug!(key = %site.key, index, "call site resolved");
        site.bind(self.id, index);
        Ok(&self.bindings[index])
    }

    /// Number of key lookups performed so far.
    pub fn lookup_count(&self) -> u64 {
        self.lookups.get()
    }
}

// Bind `key` unless an earlier registration already holds it.
fn claim(table: &mut HashMap<String, usize>, key: String, index: usize) {
    match table.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(index);
        }
        Entry::Occupied(slot) => {
            debug!(key = %slot.key(), "key already bound, keeping first registration");
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("compiled", &self.compiled.len())
            .field("natives", &self.natives.len())
            .field("lookups", &self.lookups.get())
            .finish()
    }
}
