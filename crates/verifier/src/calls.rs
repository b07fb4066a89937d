//! Call pass: calls to functions of the same package pass exactly their
//! parameter count. Calls to anything else are resolved at run time.

use ember_common::{CompiledFunction, CompiledPackage, Terminator};

use crate::error::VerifyError;
use crate::structural::PackageContext;

/// Run the call arity check on one function.
pub fn check_calls(
    package: &CompiledPackage,
    function: &CompiledFunction,
    ctx: &PackageContext,
) -> Vec<VerifyError> {
    let prefix = format!("{}/{}:", package.org, package.module);
    let mut errors = Vec::new();

    for (b, block) in function.blocks.iter().enumerate() {
        let Terminator::Call(site) = &block.terminator else {
            continue;
        };
        let callee = site.key.strip_prefix(&prefix).unwrap_or(&site.key);
        if let Some(&expected) = ctx.param_counts.get(callee) {
            if site.args.len() != expected {
                errors.push(VerifyError::ArityMismatch {
                    function: function.name.clone(),
                    block: b,
                    callee: site.key.clone(),
                    expected,
                    found: site.args.len(),
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::check_structural;
    use ember_common::{BasicBlock, BlockId, CallSite, Operand, TypeKind};

    fn caller(key: &str, args: usize) -> CompiledFunction {
        CompiledFunction::new(
            "caller",
            vec![TypeKind::Int, TypeKind::Int],
            0,
            vec![
                BasicBlock::new(
                    vec![],
                    Terminator::Call(CallSite::new(
                        key,
                        vec![Operand(1); args],
                        Some(Operand(0)),
                        BlockId(1),
                    )),
                ),
                BasicBlock::new(vec![], Terminator::Return),
            ],
        )
    }

    fn callee() -> CompiledFunction {
        CompiledFunction::new(
            "callee",
            vec![TypeKind::Int, TypeKind::Int],
            1,
            vec![BasicBlock::new(vec![], Terminator::Return)],
        )
    }

    fn check(key: &str, args: usize) -> Vec<VerifyError> {
        let pkg = CompiledPackage::new("acme", "demo", vec![caller(key, args), callee()]);
        let (ctx, _) = check_structural(&pkg);
        check_calls(&pkg, &pkg.functions[0], &ctx)
    }

    #[test]
    fn matching_arity() {
        assert!(check("callee", 1).is_empty());
        assert!(check("acme/demo:callee", 1).is_empty());
    }

    #[test]
    fn wrong_arity_bare_and_qualified() {
        assert_eq!(check("callee", 2).len(), 1);
        assert_eq!(
            check("acme/demo:callee", 0),
            vec![VerifyError::ArityMismatch {
                function: "caller".into(),
                block: 0,
                callee: "acme/demo:callee".into(),
                expected: 1,
                found: 0,
            }]
        );
    }

    #[test]
    fn external_calls_unchecked() {
        assert!(check("ember/io:println", 3).is_empty());
        assert!(check("other/pkg:callee", 3).is_empty());
    }
}
