//! Ember virtual machine: executes basic-block IR.
//!
//! The VM is a register-style machine with:
//! - A [`Frame`] of typed slots per activation
//! - A block walk that runs each block's instructions, then its terminator
//! - A [`Registry`] resolving call keys to compiled or native functions
//! - A [`Runtime`] that owns the registry and reports faults
//!
//! # Usage
//!
//! ```
//! use ember_common::{BasicBlock, BinaryOpKind, CompiledFunction, Instruction, Operand,
//!     Terminator, TypeKind, Value};
//! use ember_vm::run;
//!
//! let add = CompiledFunction::new(
//!     "add41",
//!     vec![TypeKind::Int, TypeKind::Int, TypeKind::Int],
//!     1,
//!     vec![BasicBlock::new(
//!         vec![
//!             Instruction::ConstantLoad { dest: Operand(2), value: Value::Int(41) },
//!             Instruction::BinaryOp {
//!                 op: BinaryOpKind::Add,
//!                 dest: Operand(0),
//!                 lhs: Operand(1),
//!                 rhs: Operand(2),
//!             },
//!         ],
//!         Terminator::Return,
//!     )],
//! );
//!
//! assert_eq!(run(&add, vec![Value::Int(1)]).unwrap(), Value::Int(42));
//! ```

pub mod arith;
pub mod cast;
pub mod error;
pub mod execute;
pub mod frame;
pub mod machine;
pub mod natives;
pub mod registry;
pub mod runtime;

pub use error::{Fault, InterpretError};
pub use frame::Frame;
pub use machine::{CallStack, Executor};
pub use registry::{Binding, NativeFunction, Registry};
pub use runtime::{ModuleInitializer, Runtime, RuntimeBuilder, SharedWriter, ENTRY_FUNCTION};

use ember_common::{CompiledFunction, Value};

/// Execute a standalone function with an empty registry.
///
/// Calls made by `function` fail with [`Fault::UnresolvedFunction`]; use a
/// [`Runtime`] to run functions that call others.
pub fn run(function: &CompiledFunction, args: Vec<Value>) -> Result<Value, Fault> {
    let registry = Registry::new();
    Executor::new(&registry).invoke(function, args)
}
