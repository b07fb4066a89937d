//! Control flow pass: every terminator target must be a block of the
//! same function.

use ember_common::CompiledFunction;

use crate::error::VerifyError;

/// Run the block target check on one function.
pub fn check_control_flow(function: &CompiledFunction) -> Vec<VerifyError> {
    let blocks = function.blocks.len();
    function
        .blocks
        .iter()
        .enumerate()
        .flat_map(|(b, block)| {
            block
                .terminator
                .successors()
                .into_iter()
                .filter(|target| target.index() >= blocks)
                .map(move |target| VerifyError::BlockOutOfRange {
                    function: function.name.clone(),
                    block: b,
                    target: target.index(),
                    blocks,
                })
        })
        .collect()
}
