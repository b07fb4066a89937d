//! Compiled functions and packages: the IR the VM executes.
//!
//! A package is an ordered list of functions. A function is a list of
//! declared slot types and a list of basic blocks, entered at block 0.

use crate::instruction::{BlockId, Instruction, Terminator};
use crate::type_kind::TypeKind;

/// Straight-line instructions followed by exactly one terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

impl BasicBlock {
    /// Create a block.
    pub fn new(instructions: Vec<Instruction>, terminator: Terminator) -> Self {
        Self {
            instructions,
            terminator,
        }
    }
}

/// An already type-checked function.
///
/// Slot 0 holds the return value, slots `1..=param_count` the parameters
/// in declaration order, and the remaining slots the locals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    pub name: String,
    pub slots: Vec<TypeKind>,
    pub param_count: usize,
    pub blocks: Vec<BasicBlock>,
}

impl CompiledFunction {
    /// Create a function.
    pub fn new(
        name: impl Into<String>,
        slots: Vec<TypeKind>,
        param_count: usize,
        blocks: Vec<BasicBlock>,
    ) -> Self {
        Self {
            name: name.into(),
            slots,
            param_count,
            blocks,
        }
    }

    /// Declared type of the return slot. `nil` if no slots are declared.
    pub fn return_type(&self) -> TypeKind {
        self.slots.first().cloned().unwrap_or(TypeKind::Nil)
    }

    /// Declared parameter types, in order.
    pub fn param_types(&self) -> &[TypeKind] {
        let end = (1 + self.param_count).min(self.slots.len());
        self.slots.get(1..end).unwrap_or(&[])
    }

    /// Declared local types, after the parameters.
    pub fn local_types(&self) -> &[TypeKind] {
        let start = (1 + self.param_count).min(self.slots.len());
        &self.slots[start..]
    }

    /// The block with the given id, if present.
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }
}

/// The unit of registration: every function of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPackage {
    pub org: String,
    pub module: String,
    pub functions: Vec<CompiledFunction>,
}

impl CompiledPackage {
    /// Create a package.
    pub fn new(
        org: impl Into<String>,
        module: impl Into<String>,
        functions: Vec<CompiledFunction>,
    ) -> Self {
        Self {
            org: org.into(),
            module: module.into(),
            functions,
        }
    }

    /// The registry key of a function in this package: `org/module:name`.
    pub fn qualified_name(&self, function: &str) -> String {
        qualified_name(&self.org, &self.module, function)
    }

    /// Look up a function by bare name.
    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// Format a registry key: `org/module:name`.
pub fn qualified_name(org: &str, module: &str, name: &str) -> String {
    format!("{org}/{module}:{name}")
}
