//! Arithmetic, comparison, logic and bitwise semantics.
//!
//! Every function here is pure: it takes operand values and yields the
//! result or a [`Fault`]. Dispatch is on the kind of the left operand; the
//! right operand must have the same kind except where noted.

use std::cmp::Ordering;

use ember_common::{ArrayRef, BinaryOpKind, UnaryOpKind, Value};
use num_rational::BigRational;
use num_traits::Zero;

use crate::error::Fault;

/// Evaluate `lhs <op> rhs`.
pub fn binary(op: BinaryOpKind, lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    if op.lifts_nil() && (lhs.is_nil() || rhs.is_nil()) {
        return Ok(Value::Nil);
    }
    match op {
        BinaryOpKind::Add
        | BinaryOpKind::Sub
        | BinaryOpKind::Mul
        | BinaryOpKind::Div
        | BinaryOpKind::Mod => arithmetic(op, lhs, rhs),
        BinaryOpKind::Eq => Ok(Value::Bool(equals(lhs, rhs))),
        BinaryOpKind::Ne => Ok(Value::Bool(!equals(lhs, rhs))),
        BinaryOpKind::Lt | BinaryOpKind::Le | BinaryOpKind::Gt | BinaryOpKind::Ge => {
            compare(op, lhs, rhs).map(Value::Bool)
        }
        BinaryOpKind::And | BinaryOpKind::Or => logical(op, lhs, rhs),
        BinaryOpKind::RefEq => Ok(Value::Bool(ref_equals(lhs, rhs))),
        BinaryOpKind::RefNe => Ok(Value::Bool(!ref_equals(lhs, rhs))),
        BinaryOpKind::BitAnd
        | BinaryOpKind::BitOr
        | BinaryOpKind::BitXor
        | BinaryOpKind::Shl
        | BinaryOpKind::Shr
        | BinaryOpKind::UShr => bitwise(op, lhs, rhs),
    }
}

/// Evaluate `<op> operand`.
pub fn unary(op: UnaryOpKind, operand: &Value) -> Result<Value, Fault> {
    match (op, operand) {
        (UnaryOpKind::Negate, Value::Int(v)) => v
            .checked_neg()
            .map(Value::Int)
            .ok_or(Fault::ArithmeticOverflow { op: "neg" }),
        (UnaryOpKind::Negate, Value::Float(v)) => Ok(Value::Float(-v)),
        (UnaryOpKind::Negate, Value::Decimal(v)) => Ok(Value::Decimal(-v)),
        (UnaryOpKind::Negate, other) => Err(Fault::mismatch("int, float or decimal", other.kind_name())),
        (UnaryOpKind::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOpKind::Not, other) => Err(Fault::mismatch("bool", other.kind_name())),
    }
}

fn arithmetic(op: BinaryOpKind, lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b).map(Value::Int),
        (Value::Float(a), Value::Float(b)) => float_arithmetic(op, *a, *b).map(Value::Float),
        (Value::Decimal(a), Value::Decimal(b)) => {
            decimal_arithmetic(op, a, b).map(Value::Decimal)
        }
        (Value::Str(a), Value::Str(b)) if op == BinaryOpKind::Add => {
            Ok(Value::Str(format!("{a}{b}")))
        }
        (Value::Str(_), Value::Str(_)) => Err(Fault::mismatch(
            format!("operands supporting {op}"),
            "string",
        )),
        (Value::Int(_) | Value::Float(_) | Value::Decimal(_) | Value::Str(_), _) => {
            Err(Fault::mismatch(lhs.kind_name(), rhs.kind_name()))
        }
        _ => Err(Fault::mismatch("int, float or decimal", lhs.kind_name())),
    }
}

fn int_arithmetic(op: BinaryOpKind, a: i64, b: i64) -> Result<i64, Fault> {
    let overflow = Fault::ArithmeticOverflow { op: op.mnemonic() };
    match op {
        BinaryOpKind::Add => a.checked_add(b).ok_or(overflow),
        BinaryOpKind::Sub => a.checked_sub(b).ok_or(overflow),
        BinaryOpKind::Mul => a.checked_mul(b).ok_or(overflow),
        BinaryOpKind::Div => {
            if b == 0 {
                return Err(Fault::DivisionByZero);
            }
            // MIN / -1 is the only overflowing quotient.
            a.checked_div(b).ok_or(overflow)
        }
        BinaryOpKind::Mod => {
            if b == 0 {
                return Err(Fault::DivisionByZero);
            }
            // MIN % -1 is 0.
            Ok(a.wrapping_rem(b))
        }
        _ => Err(Fault::mismatch("arithmetic operator", op.mnemonic())),
    }
}

fn float_arithmetic(op: BinaryOpKind, a: f64, b: f64) -> Result<f64, Fault> {
    match op {
        BinaryOpKind::Add => Ok(a + b),
        BinaryOpKind::Sub => Ok(a - b),
        BinaryOpKind::Mul => Ok(a * b),
        BinaryOpKind::Div | BinaryOpKind::Mod if b == 0.0 => Err(Fault::DivisionByZero),
        BinaryOpKind::Div => Ok(a / b),
        // `%` on f64 is the truncated remainder, like C's fmod.
        BinaryOpKind::Mod => Ok(a % b),
        _ => Err(Fault::mismatch("arithmetic operator", op.mnemonic())),
    }
}

fn decimal_arithmetic(
    op: BinaryOpKind,
    a: &BigRational,
    b: &BigRational,
) -> Result<BigRational, Fault> {
    match op {
        BinaryOpKind::Add => Ok(a + b),
        BinaryOpKind::Sub => Ok(a - b),
        BinaryOpKind::Mul => Ok(a * b),
        BinaryOpKind::Div | BinaryOpKind::Mod if b.is_zero() => Err(Fault::DivisionByZero),
        BinaryOpKind::Div => Ok(a / b),
        BinaryOpKind::Mod => {
            let quotient = (a / b).trunc();
            Ok(a - b * quotient)
        }
        _ => Err(Fault::mismatch("arithmetic operator", op.mnemonic())),
    }
}

/// Language-level `==`. Mismatched kinds are unequal, never a fault.
pub fn equals(lhs: &Value, rhs: &Value) -> bool {
    let mut visiting = Vec::new();
    equals_in(lhs, rhs, &mut visiting)
}

fn equals_in(lhs: &Value, rhs: &Value, visiting: &mut Vec<(*const (), *const ())>) -> bool {
    match (lhs, rhs) {
        (Value::Nil, Value::Nil) => true,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Decimal(a), Value::Decimal(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => arrays_equal(a, b, visiting),
        _ => false,
    }
}

fn arrays_equal(a: &ArrayRef, b: &ArrayRef, visiting: &mut Vec<(*const (), *const ())>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    // A pair already being compared further up is assumed equal.
    let pair = (a.as_ptr(), b.as_ptr());
    if visiting.contains(&pair) {
        return true;
    }
    let (left, right) = (a.to_vec(), b.to_vec());
    if left.len() != right.len() {
        return false;
    }
    visiting.push(pair);
    let equal = left
        .iter()
        .zip(&right)
        .all(|(x, y)| equals_in(x, y, visiting));
    visiting.pop();
    equal
}

/// Ordering comparison.
///
/// Both-`nil` compares true exactly for the operators that include
/// equality; a single `nil` compares false.
pub fn compare(op: BinaryOpKind, lhs: &Value, rhs: &Value) -> Result<bool, Fault> {
    let ordering = match (lhs, rhs) {
        (Value::Nil, Value::Nil) => {
            return Ok(matches!(op, BinaryOpKind::Le | BinaryOpKind::Ge));
        }
        (Value::Nil, _) | (_, Value::Nil) => return Ok(false),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(_) | Value::Float(_) | Value::Decimal(_) | Value::Bool(_), _) => {
            return Err(Fault::mismatch(lhs.kind_name(), rhs.kind_name()));
        }
        _ => {
            return Err(Fault::mismatch(
                "int, float, decimal or bool",
                lhs.kind_name(),
            ))
        }
    };
    // Unordered floats (NaN) compare false under every operator.
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        BinaryOpKind::Lt => ordering == Ordering::Less,
        BinaryOpKind::Le => ordering != Ordering::Greater,
        BinaryOpKind::Gt => ordering == Ordering::Greater,
        BinaryOpKind::Ge => ordering != Ordering::Less,
        _ => return Err(Fault::mismatch("ordering operator", op.mnemonic())),
    })
}

/// `===`: arrays by handle identity, everything else by value.
pub fn ref_equals(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
        (Value::Array(_), _) | (_, Value::Array(_)) => false,
        _ => equals(lhs, rhs),
    }
}

fn logical(op: BinaryOpKind, lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    let (Value::Bool(a), Value::Bool(b)) = (lhs, rhs) else {
        let found = if matches!(lhs, Value::Bool(_)) { rhs } else { lhs };
        return Err(Fault::mismatch("bool", found.kind_name()));
    };
    Ok(Value::Bool(match op {
        BinaryOpKind::And => *a && *b,
        _ => *a || *b,
    }))
}

fn bitwise(op: BinaryOpKind, lhs: &Value, rhs: &Value) -> Result<Value, Fault> {
    let (Value::Int(a), Value::Int(b)) = (lhs, rhs) else {
        let found = if matches!(lhs, Value::Int(_)) { rhs } else { lhs };
        return Err(Fault::mismatch("int", found.kind_name()));
    };
    let (a, b) = (*a, *b);
    let shift = || {
        u32::try_from(b)
            .ok()
            .filter(|amount| *amount < 64)
            .ok_or(Fault::InvalidShiftAmount { amount: b })
    };
    let result = match op {
        BinaryOpKind::BitAnd => a & b,
        BinaryOpKind::BitOr => a | b,
        BinaryOpKind::BitXor => a ^ b,
        BinaryOpKind::Shl => a.wrapping_shl(shift()?),
        BinaryOpKind::Shr => a >> shift()?,
        BinaryOpKind::UShr => ((a as u64) >> shift()?) as i64,
        _ => return Err(Fault::mismatch("bitwise operator", op.mnemonic())),
    };
    Ok(Value::Int(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::TypeKind;
    use num_bigint::BigInt;

    fn dec(n: i64, d: i64) -> Value {
        Value::Decimal(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    fn eval(op: BinaryOpKind, a: Value, b: Value) -> Result<Value, Fault> {
        binary(op, &a, &b)
    }

    // --- Integers ---

    #[test]
    fn int_add_overflow() {
        assert_eq!(
            eval(BinaryOpKind::Add, Value::Int(i64::MAX), Value::Int(1)),
            Err(Fault::ArithmeticOverflow { op: "add" })
        );
        assert_eq!(
            eval(BinaryOpKind::Add, Value::Int(40), Value::Int(2)),
            Ok(Value::Int(42))
        );
    }

    #[test]
    fn int_mul_overflow_cases() {
        assert_eq!(
            eval(BinaryOpKind::Mul, Value::Int(i64::MIN), Value::Int(-1)),
            Err(Fault::ArithmeticOverflow { op: "mul" })
        );
        assert_eq!(
            eval(BinaryOpKind::Mul, Value::Int(-1), Value::Int(i64::MIN)),
            Err(Fault::ArithmeticOverflow { op: "mul" })
        );
        assert_eq!(
            eval(BinaryOpKind::Mul, Value::Int(0), Value::Int(i64::MIN)),
            Ok(Value::Int(0))
        );
        assert_eq!(
            eval(BinaryOpKind::Mul, Value::Int(1 << 32), Value::Int(1 << 31)),
            Err(Fault::ArithmeticOverflow { op: "mul" })
        );
    }

    #[test]
    fn int_div_and_mod_edges() {
        assert_eq!(
            eval(BinaryOpKind::Div, Value::Int(7), Value::Int(0)),
            Err(Fault::DivisionByZero)
        );
        assert_eq!(
            eval(BinaryOpKind::Mod, Value::Int(7), Value::Int(0)),
            Err(Fault::DivisionByZero)
        );
        assert_eq!(
            eval(BinaryOpKind::Div, Value::Int(i64::MIN), Value::Int(-1)),
            Err(Fault::ArithmeticOverflow { op: "div" })
        );
        assert_eq!(
            eval(BinaryOpKind::Mod, Value::Int(i64::MIN), Value::Int(-1)),
            Ok(Value::Int(0))
        );
        assert_eq!(
            eval(BinaryOpKind::Div, Value::Int(-7), Value::Int(2)),
            Ok(Value::Int(-3))
        );
        assert_eq!(
            eval(BinaryOpKind::Mod, Value::Int(-7), Value::Int(2)),
            Ok(Value::Int(-1))
        );
    }

    // --- Floats and decimals ---

    #[test]
    fn float_division_by_zero() {
        assert_eq!(
            eval(BinaryOpKind::Div, Value::Float(1.0), Value::Float(0.0)),
            Err(Fault::DivisionByZero)
        );
        assert_eq!(
            eval(BinaryOpKind::Mod, Value::Float(1.0), Value::Float(-0.0)),
            Err(Fault::DivisionByZero)
        );
    }

    #[test]
    fn float_mod_is_truncated() {
        assert_eq!(
            eval(BinaryOpKind::Mod, Value::Float(-7.5), Value::Float(2.0)),
            Ok(Value::Float(-1.5))
        );
    }

    #[test]
    fn decimal_exact() {
        assert_eq!(
            eval(BinaryOpKind::Add, dec(1, 10), dec(2, 10)),
            Ok(dec(3, 10))
        );
        assert_eq!(eval(BinaryOpKind::Div, dec(1, 1), dec(3, 1)), Ok(dec(1, 3)));
        assert_eq!(
            eval(BinaryOpKind::Mod, dec(-7, 2), dec(1, 1)),
            Ok(dec(-1, 2))
        );
        assert_eq!(
            eval(BinaryOpKind::Div, dec(1, 1), dec(0, 1)),
            Err(Fault::DivisionByZero)
        );
    }

    // --- Strings and mismatches ---

    #[test]
    fn string_concat() {
        assert_eq!(
            eval(BinaryOpKind::Add, Value::from("foo"), Value::from("bar")),
            Ok(Value::from("foobar"))
        );
        assert!(matches!(
            eval(BinaryOpKind::Sub, Value::from("a"), Value::from("b")),
            Err(Fault::TypeMismatch { .. })
        ));
    }

    #[test]
    fn arithmetic_kind_mismatch() {
        assert_eq!(
            eval(BinaryOpKind::Add, Value::Int(1), Value::Float(1.0)),
            Err(Fault::mismatch("int", "float"))
        );
        assert!(matches!(
            eval(BinaryOpKind::Add, Value::Bool(true), Value::Bool(true)),
            Err(Fault::TypeMismatch { .. })
        ));
    }

    // --- Nil lifting ---

    #[test]
    fn nil_lifts_through_arithmetic_and_bitwise() {
        for op in [
            BinaryOpKind::Add,
            BinaryOpKind::Div,
            BinaryOpKind::And,
            BinaryOpKind::BitXor,
            BinaryOpKind::Shl,
        ] {
            assert_eq!(eval(op, Value::Nil, Value::Int(0)), Ok(Value::Nil), "{op}");
            assert_eq!(eval(op, Value::Int(1), Value::Nil), Ok(Value::Nil), "{op}");
        }
    }

    // --- Equality ---

    #[test]
    fn equality_mismatch_is_false() {
        assert_eq!(
            eval(BinaryOpKind::Eq, Value::Int(1), Value::Float(1.0)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            eval(BinaryOpKind::Ne, Value::Nil, Value::Int(0)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval(BinaryOpKind::Eq, Value::Nil, Value::Nil),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval(BinaryOpKind::Eq, Value::Float(f64::NAN), Value::Float(f64::NAN)),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn array_equality_is_structural() {
        let a = ArrayRef::new(TypeKind::Int, vec![Value::Int(1), Value::Int(2)]);
        let b = ArrayRef::new(TypeKind::Int, vec![Value::Int(1), Value::Int(2)]);
        let c = ArrayRef::new(TypeKind::Int, vec![Value::Int(1)]);
        assert!(equals(&Value::Array(a.clone()), &Value::Array(b)));
        assert!(!equals(&Value::Array(a), &Value::Array(c)));
    }

    #[test]
    fn cyclic_array_equality_terminates() {
        let a = ArrayRef::new(TypeKind::Any, vec![]);
        a.push([Value::Array(a.clone())]);
        let b = ArrayRef::new(TypeKind::Any, vec![]);
        b.push([Value::Array(b.clone())]);
        assert!(equals(&Value::Array(a), &Value::Array(b)));
    }

    // --- Ordering ---

    #[test]
    fn nil_ordering() {
        assert_eq!(
            eval(BinaryOpKind::Le, Value::Nil, Value::Nil),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval(BinaryOpKind::Lt, Value::Nil, Value::Nil),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            eval(BinaryOpKind::Ge, Value::Int(1), Value::Nil),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn ordering_values() {
        assert_eq!(
            eval(BinaryOpKind::Lt, Value::Int(1), Value::Int(2)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval(BinaryOpKind::Gt, Value::Bool(true), Value::Bool(false)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            eval(BinaryOpKind::Ge, dec(1, 3), dec(1, 2)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            eval(BinaryOpKind::Le, Value::Float(f64::NAN), Value::Float(1.0)),
            Ok(Value::Bool(false))
        );
    }

    #[test]
    fn ordering_mismatch_faults() {
        assert_eq!(
            eval(BinaryOpKind::Lt, Value::Int(1), Value::Float(2.0)),
            Err(Fault::mismatch("int", "float"))
        );
        assert!(matches!(
            eval(BinaryOpKind::Lt, Value::from("a"), Value::from("b")),
            Err(Fault::TypeMismatch { .. })
        ));
    }

    // --- Reference equality ---

    #[test]
    fn reference_equality() {
        let a = Value::Array(ArrayRef::new(TypeKind::Int, vec![]));
        let b = Value::Array(ArrayRef::new(TypeKind::Int, vec![]));
        assert_eq!(eval(BinaryOpKind::RefEq, a.clone(), a.clone()), Ok(Value::Bool(true)));
        assert_eq!(eval(BinaryOpKind::RefEq, a.clone(), b), Ok(Value::Bool(false)));
        assert_eq!(
            eval(BinaryOpKind::RefEq, Value::Nil, Value::Nil),
            Ok(Value::Bool(true))
        );
        assert_eq!(eval(BinaryOpKind::RefNe, a, Value::Nil), Ok(Value::Bool(true)));
        assert_eq!(
            eval(BinaryOpKind::RefEq, Value::Int(5), Value::Int(5)),
            Ok(Value::Bool(true))
        );
    }

    // --- Logic and bits ---

    #[test]
    fn logical_requires_bool() {
        assert_eq!(
            eval(BinaryOpKind::And, Value::Bool(true), Value::Bool(false)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            eval(BinaryOpKind::Or, Value::Bool(true), Value::Int(0)),
            Err(Fault::mismatch("bool", "int"))
        );
    }

    #[test]
    fn shifts() {
        assert_eq!(
            eval(BinaryOpKind::Shl, Value::Int(1), Value::Int(63)),
            Ok(Value::Int(i64::MIN))
        );
        assert_eq!(
            eval(BinaryOpKind::Shr, Value::Int(-8), Value::Int(1)),
            Ok(Value::Int(-4))
        );
        assert_eq!(
            eval(BinaryOpKind::UShr, Value::Int(-1), Value::Int(60)),
            Ok(Value::Int(15))
        );
        assert_eq!(
            eval(BinaryOpKind::Shl, Value::Int(1), Value::Int(64)),
            Err(Fault::InvalidShiftAmount { amount: 64 })
        );
        assert_eq!(
            eval(BinaryOpKind::Shr, Value::Int(1), Value::Int(-1)),
            Err(Fault::InvalidShiftAmount { amount: -1 })
        );
    }

    #[test]
    fn bitwise_requires_int() {
        assert_eq!(
            eval(BinaryOpKind::BitAnd, Value::Int(0b1100), Value::Int(0b1010)),
            Ok(Value::Int(0b1000))
        );
        assert_eq!(
            eval(BinaryOpKind::BitOr, Value::Float(1.0), Value::Int(1)),
            Err(Fault::mismatch("int", "float"))
        );
    }

    // --- Unary ---

    #[test]
    fn negate() {
        assert_eq!(
            unary(UnaryOpKind::Negate, &Value::Int(i64::MIN)),
            Err(Fault::ArithmeticOverflow { op: "neg" })
        );
        assert_eq!(unary(UnaryOpKind::Negate, &Value::Int(5)), Ok(Value::Int(-5)));
        assert_eq!(
            unary(UnaryOpKind::Negate, &Value::Float(0.5)),
            Ok(Value::Float(-0.5))
        );
        assert_eq!(unary(UnaryOpKind::Negate, &dec(1, 4)), Ok(dec(-1, 4)));
    }

    #[test]
    fn not() {
        assert_eq!(unary(UnaryOpKind::Not, &Value::Bool(true)), Ok(Value::Bool(false)));
        assert_eq!(
            unary(UnaryOpKind::Not, &Value::Int(0)),
            Err(Fault::mismatch("bool", "int"))
        );
    }
}
