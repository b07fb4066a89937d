//! Ember verifier: static well-formedness checks for compiled packages.
//!
//! The verifier checks a `CompiledPackage` BEFORE it is registered with a
//! runtime. It collects ALL errors (not just the first) and returns them.
//! The interpreter itself never depends on this crate; packages that skip
//! verification fault at run time instead.
//!
//! # Usage
//!
//! ```
//! use ember_common::{
//!     BasicBlock, CompiledFunction, CompiledPackage, Instruction, Operand, Terminator,
//!     TypeKind, Value,
//! };
//! use ember_verifier::verify;
//!
//! let main = CompiledFunction::new(
//!     "main",
//!     vec![TypeKind::Int],
//!     0,
//!     vec![BasicBlock::new(
//!         vec![Instruction::ConstantLoad { dest: Operand(0), value: Value::Int(42) }],
//!         Terminator::Return,
//!     )],
//! );
//! let package = CompiledPackage::new("acme", "demo", vec![main]);
//!
//! assert!(verify(&package).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: slot and block counts, parameter counts, unique names
//! 2. **Operands**: every slot reference within the frame
//! 3. **Control flow**: every terminator target within the function
//! 4. **Reachability**: every block reachable from bb0
//! 5. **Types**: constant kinds and branch conditions
//! 6. **Calls**: argument counts of calls within the package

pub mod calls;
pub mod control_flow;
pub mod error;
pub mod operands;
pub mod reachability;
pub mod structural;
pub mod types;

pub use error::VerifyError;

use ember_common::CompiledPackage;

/// Verify a package for well-formedness.
///
/// Returns `Ok(())` if the package passes all checks, or
/// `Err(Vec<VerifyError>)` with all errors found.
///
/// If the structural pass finds fatal errors (a function without slots or
/// blocks), the per-function passes are skipped.
pub fn verify(package: &CompiledPackage) -> Result<(), Vec<VerifyError>> {
    let mut all_errors = Vec::new();

    let (ctx, structural_errors) = structural::check_structural(package);
    all_errors.extend(structural_errors);

    if !ctx.fatal {
        for function in &package.functions {
            all_errors.extend(operands::check_operands(function));
            all_errors.extend(control_flow::check_control_flow(function));
            all_errors.extend(reachability::check_reachability(function));
            all_errors.extend(types::check_types(function));
            all_errors.extend(calls::check_calls(package, function, &ctx));
        }
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}
