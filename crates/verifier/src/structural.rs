//! Structural validation pass.
//!
//! Checks slot and block counts and function names, and builds the
//! [`PackageContext`] used by later passes.

use std::collections::HashMap;

use ember_common::CompiledPackage;

use crate::error::VerifyError;

/// Context built from the structural pass, consumed by later passes.
#[derive(Debug, Clone, Default)]
pub struct PackageContext {
    /// Parameter count of each function, by bare name.
    pub param_counts: HashMap<String, usize>,
    /// Whether a fatal structural error occurred (callers should skip later passes).
    pub fatal: bool,
}

/// Run the structural validation pass.
pub fn check_structural(package: &CompiledPackage) -> (PackageContext, Vec<VerifyError>) {
    let mut ctx = PackageContext::default();
    let mut errors = Vec::new();

    for function in &package.functions {
        let name = || function.name.clone();

        if function.slots.is_empty() {
            errors.push(VerifyError::NoSlots { function: name() });
            ctx.fatal = true;
        }
        if function.blocks.is_empty() {
            errors.push(VerifyError::NoBlocks { function: name() });
            ctx.fatal = true;
        }
        let available = function.slots.len().saturating_sub(1);
        if function.param_count > available {
            errors.push(VerifyError::TooManyParams {
                function: name(),
                params: function.param_count,
                slots: available,
            });
        }

        if ctx
            .param_counts
            .insert(function.name.clone(), function.param_count)
            .is_some()
        {
            errors.push(VerifyError::DuplicateFunction { function: name() });
        }
    }

    (ctx, errors)
}
