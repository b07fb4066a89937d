//! Instructions and terminators of a basic block.
//!
//! Every instruction addresses frame slots through [`Operand`]s. The
//! terminator ending a block names successor blocks through [`BlockId`]s.

use std::cell::Cell;
use std::fmt;

use crate::opcode::{BinaryOpKind, UnaryOpKind};
use crate::type_kind::TypeKind;
use crate::value::Value;

/// Index of a slot in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operand(pub u32);

impl Operand {
    /// The slot index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Index of a basic block within its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The entry block of every function.
    pub const ENTRY: BlockId = BlockId(0);

    /// The block index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// A straight-line instruction. Never transfers control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `dest = value`
    ConstantLoad { dest: Operand, value: Value },
    /// `dest = src`. Arrays are shared, not copied.
    Move { dest: Operand, src: Operand },
    /// Allocate an array of `max(size, values.len())` elements.
    NewArray {
        dest: Operand,
        element: TypeKind,
        size: Option<Operand>,
        values: Vec<Operand>,
    },
    /// `dest = array[index]`
    ArrayLoad {
        dest: Operand,
        array: Operand,
        index: Operand,
    },
    /// `array[index] = value`, growing the array if needed.
    ArrayStore {
        array: Operand,
        index: Operand,
        value: Operand,
    },
    /// `dest = lhs <op> rhs`
    BinaryOp {
        op: BinaryOpKind,
        dest: Operand,
        lhs: Operand,
        rhs: Operand,
    },
    /// `dest = <op> operand`
    UnaryOp {
        op: UnaryOpKind,
        dest: Operand,
        operand: Operand,
    },
    /// `dest = src as target`
    TypeCast {
        dest: Operand,
        src: Operand,
        target: TypeKind,
    },
}

impl Instruction {
    /// The slot written by this instruction, if any.
    pub fn dest(&self) -> Option<Operand> {
        match self {
            Instruction::ConstantLoad { dest, .. }
            | Instruction::Move { dest, .. }
            | Instruction::NewArray { dest, .. }
            | Instruction::ArrayLoad { dest, .. }
            | Instruction::BinaryOp { dest, .. }
            | Instruction::UnaryOp { dest, .. }
            | Instruction::TypeCast { dest, .. } => Some(*dest),
            Instruction::ArrayStore { .. } => None,
        }
    }

    /// Every slot this instruction reads or writes, destination first.
    pub fn operands(&self) -> Vec<Operand> {
        match self {
            Instruction::ConstantLoad { dest, .. } => vec![*dest],
            Instruction::Move { dest, src } => vec![*dest, *src],
            Instruction::NewArray {
                dest, size, values, ..
            } => {
                let mut all = vec![*dest];
                all.extend(size.iter().copied());
                all.extend(values.iter().copied());
                all
            }
            Instruction::ArrayLoad { dest, array, index } => vec![*dest, *array, *index],
            Instruction::ArrayStore {
                array,
                index,
                value,
            } => vec![*array, *index, *value],
            Instruction::BinaryOp { dest, lhs, rhs, .. } => vec![*dest, *lhs, *rhs],
            Instruction::UnaryOp { dest, operand, .. } => vec![*dest, *operand],
            Instruction::TypeCast { dest, src, .. } => vec![*dest, *src],
        }
    }
}

/// A call target bound by a registry.
///
/// `registry` identifies the registry that produced the binding and
/// `index` is that registry's slot for the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundTarget {
    pub registry: u64,
    pub index: usize,
}

/// The operands and continuation of a `Call` terminator, plus its
/// resolution cache.
#[derive(Debug, Clone)]
pub struct CallSite {
    /// Function key: `org/module:name` or a bare name.
    pub key: String,
    /// Argument slots, in parameter order.
    pub args: Vec<Operand>,
    /// Slot receiving the return value, if any.
    pub dest: Option<Operand>,
    /// Block to continue with after the call returns.
    pub next: BlockId,
    cache: Cell<Option<BoundTarget>>,
}

impl CallSite {
    /// Create an unresolved call site.
    pub fn new(
        key: impl Into<String>,
        args: Vec<Operand>,
        dest: Option<Operand>,
        next: BlockId,
    ) -> Self {
        Self {
            key: key.into(),
            args,
            dest,
            next,
            cache: Cell::new(None),
        }
    }

    /// The binding cached by `registry`, if this site has been resolved by it.
    pub fn cached(&self, registry: u64) -> Option<usize> {
        self.cache
            .get()
            .filter(|bound| bound.registry == registry)
            .map(|bound| bound.index)
    }

    /// Remember the binding produced by `registry`.
    pub fn bind(&self, registry: u64, index: usize) {
        self.cache.set(Some(BoundTarget { registry, index }));
    }
}

// The cache is an execution artifact, not part of the IR.
impl PartialEq for CallSite {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.args == other.args
            && self.dest == other.dest
            && self.next == other.next
    }
}

impl Eq for CallSite {}

/// The single control transfer ending a basic block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    /// Continue with another block.
    Goto(BlockId),
    /// Continue with `on_true` or `on_false` depending on a boolean slot.
    Branch {
        condition: Operand,
        on_true: BlockId,
        on_false: BlockId,
    },
    /// Invoke a function, then continue with `site.next`.
    Call(CallSite),
    /// Leave the function, yielding slot 0.
    Return,
}

impl Terminator {
    /// Blocks control may continue with.
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Goto(next) => vec![*next],
            Terminator::Branch {
                on_true, on_false, ..
            } => vec![*on_true, *on_false],
            Terminator::Call(site) => vec![site.next],
            Terminator::Return => Vec::new(),
        }
    }

    /// Every slot this terminator reads or writes.
    pub fn operands(&self) -> Vec<Operand> {
        match self {
            Terminator::Branch { condition, .. } => vec![*condition],
            Terminator::Call(site) => {
                let mut all: Vec<Operand> = site.dest.iter().copied().collect();
                all.extend(site.args.iter().copied());
                all
            }
            Terminator::Goto(_) | Terminator::Return => Vec::new(),
        }
    }
}
