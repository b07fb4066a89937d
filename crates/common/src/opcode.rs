//! Operator kinds for `BinaryOp` and `UnaryOp` instructions.

use std::fmt;

/// The operator of a two-operand instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpKind {
    // Arithmetic
    /// Sum, or concatenation for strings.
    Add,
    /// Difference.
    Sub,
    /// Product.
    Mul,
    /// Quotient. Integer division truncates toward zero.
    Div,
    /// Truncated remainder.
    Mod,

    // Comparison
    /// Value equality. Never faults.
    Eq,
    /// Value inequality. Never faults.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,

    // Logic
    /// Logical and of two booleans.
    And,
    /// Logical or of two booleans.
    Or,

    // Identity
    /// Reference equality (`===`).
    RefEq,
    /// Reference inequality (`!==`).
    RefNe,

    // Bitwise
    /// Bitwise and.
    BitAnd,
    /// Bitwise or.
    BitOr,
    /// Bitwise exclusive or.
    BitXor,
    /// Left shift.
    Shl,
    /// Arithmetic right shift.
    Shr,
    /// Logical right shift.
    UShr,
}

/// All binary operator kinds, in definition order.
pub const ALL_BINARY_OPS: [BinaryOpKind; 21] = [
    BinaryOpKind::Add,
    BinaryOpKind::Sub,
    BinaryOpKind::Mul,
    BinaryOpKind::Div,
    BinaryOpKind::Mod,
    BinaryOpKind::Eq,
    BinaryOpKind::Ne,
    BinaryOpKind::Lt,
    BinaryOpKind::Le,
    BinaryOpKind::Gt,
    BinaryOpKind::Ge,
    BinaryOpKind::And,
    BinaryOpKind::Or,
    BinaryOpKind::RefEq,
    BinaryOpKind::RefNe,
    BinaryOpKind::BitAnd,
    BinaryOpKind::BitOr,
    BinaryOpKind::BitXor,
    BinaryOpKind::Shl,
    BinaryOpKind::Shr,
    BinaryOpKind::UShr,
];

impl BinaryOpKind {
    /// Returns the assembly mnemonic for this operator.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinaryOpKind::Add => "add",
            BinaryOpKind::Sub => "sub",
            BinaryOpKind::Mul => "mul",
            BinaryOpKind::Div => "div",
            BinaryOpKind::Mod => "mod",
            BinaryOpKind::Eq => "eq",
            BinaryOpKind::Ne => "ne",
            BinaryOpKind::Lt => "lt",
            BinaryOpKind::Le => "le",
            BinaryOpKind::Gt => "gt",
            BinaryOpKind::Ge => "ge",
            BinaryOpKind::And => "and",
            BinaryOpKind::Or => "or",
            BinaryOpKind::RefEq => "refeq",
            BinaryOpKind::RefNe => "refne",
            BinaryOpKind::BitAnd => "band",
            BinaryOpKind::BitOr => "bor",
            BinaryOpKind::BitXor => "bxor",
            BinaryOpKind::Shl => "shl",
            BinaryOpKind::Shr => "shr",
            BinaryOpKind::UShr => "ushr",
        }
    }

    /// Looks up an operator by its mnemonic.
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        ALL_BINARY_OPS.iter().copied().find(|op| op.mnemonic() == text)
    }

    /// Returns true for operators that yield `nil` when either operand is `nil`.
    pub fn lifts_nil(&self) -> bool {
        matches!(
            self,
            BinaryOpKind::Add
                | BinaryOpKind::Sub
                | BinaryOpKind::Mul
                | BinaryOpKind::Div
                | BinaryOpKind::Mod
                | BinaryOpKind::And
                | BinaryOpKind::Or
                | BinaryOpKind::BitAnd
                | BinaryOpKind::BitOr
                | BinaryOpKind::BitXor
                | BinaryOpKind::Shl
                | BinaryOpKind::Shr
                | BinaryOpKind::UShr
        )
    }

    /// Returns true for the four ordering comparisons.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOpKind::Lt | BinaryOpKind::Le | BinaryOpKind::Gt | BinaryOpKind::Ge
        )
    }
}

impl fmt::Display for BinaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The operator of a one-operand instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    /// Arithmetic negation.
    Negate,
    /// Boolean not.
    Not,
}

/// All unary operator kinds.
pub const ALL_UNARY_OPS: [UnaryOpKind; 2] = [UnaryOpKind::Negate, UnaryOpKind::Not];

impl UnaryOpKind {
    /// Returns the assembly mnemonic for this operator.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            UnaryOpKind::Negate => "neg",
            UnaryOpKind::Not => "not",
        }
    }

    /// Looks up an operator by its mnemonic.
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        ALL_UNARY_OPS.iter().copied().find(|op| op.mnemonic() == text)
    }
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
