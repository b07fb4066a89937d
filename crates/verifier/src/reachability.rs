//! Reachability analysis.
//!
//! Every block must be reachable from the entry block. Unreachable blocks
//! are errors.

use ember_common::{BlockId, CompiledFunction};

use crate::error::VerifyError;

/// Run the reachability check on one function.
pub fn check_reachability(function: &CompiledFunction) -> Vec<VerifyError> {
    let len = function.blocks.len();
    if len == 0 {
        return Vec::new();
    }

    let mut reachable = vec![false; len];
    let mut worklist = vec![BlockId::ENTRY];
    while let Some(id) = worklist.pop() {
        let Some(seen) = reachable.get_mut(id.index()) else {
            // Out-of-range targets are reported by the control flow pass.
            continue;
        };
        if *seen {
            continue;
        }
        *seen = true;
        if let Some(block) = function.block(id) {
            worklist.extend(block.terminator.successors());
        }
    }

    reachable
        .iter()
        .enumerate()
        .filter(|(_, &is_reachable)| !is_reachable)
        .map(|(block, _)| VerifyError::UnreachableBlock {
            function: function.name.clone(),
            block,
        })
        .collect()
}
