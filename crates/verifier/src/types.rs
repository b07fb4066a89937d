//! Type checking pass.
//!
//! The IR is already type-checked upstream; this pass only catches the
//! mismatches visible without inference: constants stored into slots of
//! another type, and branches on non-boolean slots.

use ember_common::{CompiledFunction, Instruction, Terminator, TypeKind};

use crate::error::VerifyError;

/// Run the type check on one function.
pub fn check_types(function: &CompiledFunction) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let declared = |slot: usize| function.slots.get(slot);

    for (b, block) in function.blocks.iter().enumerate() {
        for (at, instruction) in block.instructions.iter().enumerate() {
            if let Instruction::ConstantLoad { dest, value } = instruction {
                match declared(dest.index()) {
                    Some(kind) if !kind.admits(value) => {
                        errors.push(VerifyError::ConstantTypeMismatch {
                            function: function.name.clone(),
                            block: b,
                            at,
                            slot: dest.index(),
                            expected: kind.clone(),
                            found: value.kind_name(),
                        });
                    }
                    _ => {}
                }
            }
        }

        if let Terminator::Branch { condition, .. } = &block.terminator {
            match declared(condition.index()) {
                Some(TypeKind::Bool | TypeKind::Any) | None => {}
                Some(other) => errors.push(VerifyError::NonBoolCondition {
                    function: function.name.clone(),
                    block: b,
                    slot: condition.index(),
                    found: other.clone(),
                }),
            }
        }
    }

    errors
}
