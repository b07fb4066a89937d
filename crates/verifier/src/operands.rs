//! Operand range pass: every slot an instruction or terminator names
//! must exist in the frame.

use ember_common::{CompiledFunction, Operand};

use crate::error::VerifyError;

/// Run the operand range check on one function.
pub fn check_operands(function: &CompiledFunction) -> Vec<VerifyError> {
    let slots = function.slots.len();
    let mut errors = Vec::new();
    let mut check = |block: usize, at: usize, operands: Vec<Operand>| {
        for operand in operands {
            if operand.index() >= slots {
                errors.push(VerifyError::OperandOutOfRange {
                    function: function.name.clone(),
                    block,
                    at,
                    slot: operand.index(),
                    slots,
                });
            }
        }
    };

    for (b, block) in function.blocks.iter().enumerate() {
        for (at, instruction) in block.instructions.iter().enumerate() {
            check(b, at, instruction.operands());
        }
        check(b, block.instructions.len(), block.terminator.operands());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::{BasicBlock, BlockId, CallSite, Instruction, Terminator, TypeKind};

    #[test]
    fn reports_every_bad_operand() {
        let f = CompiledFunction::new(
            "f",
            vec![TypeKind::Int, TypeKind::Int],
            0,
            vec![BasicBlock::new(
                vec![Instruction::Move {
                    dest: Operand(2),
                    src: Operand(1),
                }],
                Terminator::Call(CallSite::new(
                    "g",
                    vec![Operand(5)],
                    Some(Operand(0)),
                    BlockId(0),
                )),
            )],
        );
        let errors = check_operands(&f);
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            VerifyError::OperandOutOfRange { at: 0, slot: 2, .. }
        ));
        assert!(matches!(
            errors[1],
            VerifyError::OperandOutOfRange { at: 1, slot: 5, .. }
        ));
    }
}
