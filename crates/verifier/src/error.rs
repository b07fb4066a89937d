//! Verification errors for the Ember verifier.
//!
//! Every error names the function it was found in, and the block and
//! instruction position where that applies. Position `at` equal to the
//! block's instruction count refers to the terminator.

use ember_common::TypeKind;
use thiserror::Error;

/// Errors found during static verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Structural ---
    /// A function without a return slot.
    #[error("function '{function}' declares no slots")]
    NoSlots { function: String },

    /// A function without an entry block.
    #[error("function '{function}' has no blocks")]
    NoBlocks { function: String },

    /// More parameters than slots after the return slot.
    #[error("function '{function}' declares {params} parameters but only {slots} slots")]
    TooManyParams {
        function: String,
        params: usize,
        slots: usize,
    },

    /// Two functions with the same name in one package.
    #[error("duplicate function '{function}'")]
    DuplicateFunction { function: String },

    // --- Operands ---
    /// An operand beyond the declared slots.
    #[error("{function} bb{block}[{at}]: slot %{slot} out of range ({slots} slots)")]
    OperandOutOfRange {
        function: String,
        block: usize,
        at: usize,
        slot: usize,
        slots: usize,
    },

    // --- Control flow ---
    /// A terminator naming a block the function does not have.
    #[error("{function} bb{block}: target bb{target} out of range ({blocks} blocks)")]
    BlockOutOfRange {
        function: String,
        block: usize,
        target: usize,
        blocks: usize,
    },

    /// A block no path from bb0 reaches.
    #[error("{function} bb{block}: unreachable block")]
    UnreachableBlock { function: String, block: usize },

    // --- Types ---
    /// A constant whose kind the destination slot does not admit.
    #[error("{function} bb{block}[{at}]: {found} constant stored in %{slot} of type {expected}")]
    ConstantTypeMismatch {
        function: String,
        block: usize,
        at: usize,
        slot: usize,
        expected: TypeKind,
        found: &'static str,
    },

    /// A branch on a slot not declared `bool` or `any`.
    #[error("{function} bb{block}: branch condition %{slot} has type {found}, expected bool")]
    NonBoolCondition {
        function: String,
        block: usize,
        slot: usize,
        found: TypeKind,
    },

    // --- Calls ---
    /// A call to a function of the same package with the wrong argument count.
    #[error("{function} bb{block}: call to '{callee}' passes {found} arguments, expected {expected}")]
    ArityMismatch {
        function: String,
        block: usize,
        callee: String,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_variants_display() {
        let f = || "f".to_string();
        let errors: Vec<VerifyError> = vec![
            VerifyError::NoSlots { function: f() },
            VerifyError::NoBlocks { function: f() },
            VerifyError::TooManyParams {
                function: f(),
                params: 3,
                slots: 2,
            },
            VerifyError::DuplicateFunction { function: f() },
            VerifyError::OperandOutOfRange {
                function: f(),
                block: 0,
                at: 1,
                slot: 9,
                slots: 3,
            },
            VerifyError::BlockOutOfRange {
                function: f(),
                block: 0,
                target: 4,
                blocks: 2,
            },
            VerifyError::UnreachableBlock {
                function: f(),
                block: 1,
            },
            VerifyError::ConstantTypeMismatch {
                function: f(),
                block: 0,
                at: 0,
                slot: 1,
                expected: TypeKind::Int,
                found: "string",
            },
            VerifyError::NonBoolCondition {
                function: f(),
                block: 0,
                slot: 1,
                found: TypeKind::Int,
            },
            VerifyError::ArityMismatch {
                function: f(),
                block: 0,
                callee: "g".into(),
                expected: 1,
                found: 2,
            },
        ];

        for error in &errors {
            let display = error.to_string();
            assert!(!display.is_empty(), "empty display for {error:?}");
        }
        assert_eq!(errors.len(), 10);
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            VerifyError::OperandOutOfRange {
                function: "main".into(),
                block: 2,
                at: 0,
                slot: 7,
                slots: 4,
            }
            .to_string(),
            "main bb2[0]: slot %7 out of range (4 slots)"
        );
        assert_eq!(
            VerifyError::ConstantTypeMismatch {
                function: "main".into(),
                block: 0,
                at: 3,
                slot: 1,
                expected: TypeKind::array_of(TypeKind::Int),
                found: "float",
            }
            .to_string(),
            "main bb0[3]: float constant stored in %1 of type int[]"
        );
    }
}
