//! Runtime faults for the Ember VM.
//!
//! A [`Fault`] aborts the whole interpretation. The [`Runtime`](crate::Runtime)
//! is the only place faults are caught; it wraps them in an
//! [`InterpretError`] together with the call stack at the point of failure.

use thiserror::Error;

/// Errors raised while executing IR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Signed 64-bit overflow in an integer operation.
    #[error("integer overflow in {op}")]
    ArithmeticOverflow { op: &'static str },

    /// Integer, float or decimal division or remainder by zero.
    #[error("divide by zero")]
    DivisionByZero,

    /// Shift amount outside `0..64`.
    #[error("shift amount {amount} out of range 0..64")]
    InvalidShiftAmount { amount: i64 },

    /// An operand had a kind the operation does not accept.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A value could not be converted to the cast target.
    #[error("cannot cast {value} to {target}")]
    InvalidCast { value: String, target: String },

    /// Array index outside the permitted range.
    #[error("index {index} out of bounds (length {length})")]
    IndexOutOfBounds { index: i64, length: usize },

    /// No compiled or native function is registered under the key.
    #[error("function '{name}' not found")]
    UnresolvedFunction { name: String },

    /// Pop on an empty call stack.
    #[error("call stack underflow")]
    StackUnderflow,

    /// Operand beyond the frame's declared slots.
    #[error("slot {slot} out of range (frame has {slots} slots)")]
    OutOfRange { slot: usize, slots: usize },

    /// Control transfer to a block the function does not have.
    #[error("block bb{block} out of range (function has {blocks} blocks)")]
    InvalidBlock { block: usize, blocks: usize },

    /// More arguments than the callee has slots for.
    #[error("function '{function}' accepts {expected} arguments, got {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    /// Error reported by a native function.
    #[error("{0}")]
    Native(String),
}

impl Fault {
    /// Shorthand for a [`Fault::TypeMismatch`].
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Fault::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A fault that escaped to the runtime boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{fault}{}", render_stack(.stack))]
pub struct InterpretError {
    /// What went wrong.
    pub fault: Fault,
    /// Active functions when the fault was raised, innermost last.
    pub stack: Vec<String>,
}

fn render_stack(stack: &[String]) -> String {
    if stack.is_empty() {
        String::new()
    } else {
        format!(" (in {})", stack.join(" > "))
    }
}
