//! Disassembler: package → canonical IR text.
//!
//! Canonical form: the `package` line, then each function preceded by a
//! blank line. Labels start in column 0; locals, instructions and
//! terminators are indented two spaces. No comments.

use std::fmt::Write;

use ember_common::decimal::format_decimal;
use ember_common::{CompiledFunction, CompiledPackage, Instruction, Terminator, Value};

/// Disassemble a package into canonical text.
pub fn disassemble(package: &CompiledPackage) -> String {
    let mut out = format!("package {}/{}\n", package.org, package.module);
    for function in &package.functions {
        out.push('\n');
        out.push_str(&disassemble_function(function));
    }
    out
}

/// Disassemble one function, from its `func` line through `end`.
pub fn disassemble_function(function: &CompiledFunction) -> String {
    let mut out = String::new();
    let params: Vec<String> = function
        .param_types()
        .iter()
        .map(ToString::to_string)
        .collect();
    let _ = writeln!(
        out,
        "func {}({}) -> {}",
        function.name,
        params.join(", "),
        function.return_type()
    );
    for local in function.local_types() {
        let _ = writeln!(out, "  local {local}");
    }
    for (index, block) in function.blocks.iter().enumerate() {
        let _ = writeln!(out, "bb{index}:");
        for instruction in &block.instructions {
            let _ = writeln!(out, "  {}", instruction_text(instruction));
        }
        let _ = writeln!(out, "  {}", terminator_text(&block.terminator));
    }
    out.push_str("end\n");
    out
}

fn instruction_text(instruction: &Instruction) -> String {
    match instruction {
        Instruction::ConstantLoad { dest, value } => format!("{dest} = const {}", literal(value)),
        Instruction::Move { dest, src } => format!("{dest} = move {src}"),
        Instruction::NewArray {
            dest,
            element,
            size,
            values,
        } => {
            let mut text = format!("{dest} = newarray {element}");
            if let Some(size) = size {
                let _ = write!(text, " len {size}");
            }
            for value in values {
                let _ = write!(text, " {value}");
            }
            text
        }
        Instruction::ArrayLoad { dest, array, index } => format!("{dest} = load {array} {index}"),
        Instruction::ArrayStore {
            array,
            index,
            value,
        } => format!("store {array} {index} {value}"),
        Instruction::BinaryOp { op, dest, lhs, rhs } => format!("{dest} = {op} {lhs} {rhs}"),
        Instruction::UnaryOp { op, dest, operand } => format!("{dest} = {op} {operand}"),
        Instruction::TypeCast { dest, src, target } => format!("{dest} = cast {target} {src}"),
    }
}

fn terminator_text(terminator: &Terminator) -> String {
    match terminator {
        Terminator::Goto(next) => format!("goto {next}"),
        Terminator::Branch {
            condition,
            on_true,
            on_false,
        } => format!("branch {condition} {on_true} {on_false}"),
        Terminator::Call(site) => {
            let args: Vec<String> = site.args.iter().map(ToString::to_string).collect();
            let call = format!("call {}({}) {}", site.key, args.join(", "), site.next);
            match site.dest {
                Some(dest) => format!("{dest} = {call}"),
                None => call,
            }
        }
        Terminator::Return => "return".to_string(),
    }
}

/// Literal text the lexer reads back to the same value.
///
/// Array constants have no literal syntax and print in display form.
fn literal(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) if n.is_nan() => "NaN".to_string(),
        Value::Float(n) if n.is_infinite() => {
            if *n > 0.0 { "inf" } else { "-inf" }.to_string()
        }
        Value::Float(n) => format!("{n:?}"),
        Value::Decimal(n) => format!("{}d", format_decimal(n)),
        Value::Str(s) => quote(s),
        Value::Array(_) => value.to_string(),
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::{BasicBlock, BinaryOpKind, BlockId, CallSite, Operand, TypeKind};
    use num_bigint::BigInt;
    use num_rational::BigRational;

    #[test]
    fn literal_forms() {
        assert_eq!(literal(&Value::Float(2.0)), "2.0");
        assert_eq!(literal(&Value::Float(1e300)), "1e300");
        assert_eq!(literal(&Value::Float(f64::NEG_INFINITY)), "-inf");
        assert_eq!(
            literal(&Value::Decimal(BigRational::new(
                BigInt::from(-1),
                BigInt::from(3)
            ))),
            "-1/3d"
        );
        assert_eq!(
            literal(&Value::Decimal(BigRational::new(
                BigInt::from(13),
                BigInt::from(4)
            ))),
            "3.25d"
        );
        assert_eq!(literal(&Value::Str("a\"b\n".into())), r#""a\"b\n""#);
    }

    #[test]
    fn function_text() {
        let f = CompiledFunction::new(
            "inc",
            vec![TypeKind::Int, TypeKind::Int, TypeKind::Int],
            1,
            vec![
                BasicBlock::new(
                    vec![
                        Instruction::ConstantLoad {
                            dest: Operand(2),
                            value: Value::Int(1),
                        },
                        Instruction::BinaryOp {
                            op: BinaryOpKind::Add,
                            dest: Operand(0),
                            lhs: Operand(1),
                            rhs: Operand(2),
                        },
                    ],
                    Terminator::Call(CallSite::new(
                        "ember/io:println",
                        vec![Operand(0), Operand(1)],
                        None,
                        BlockId(1),
                    )),
                ),
                BasicBlock::new(vec![], Terminator::Return),
            ],
        );
        assert_eq!(
            disassemble_function(&f),
            "func inc(int) -> int\n  local int\nbb0:\n  %2 = const 1\n  %0 = add %1 %2\n  call ember/io:println(%0, %1) bb1\nbb1:\n  return\nend\n"
        );
    }
}
