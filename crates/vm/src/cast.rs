//! `TypeCast` semantics.

use ember_common::decimal::parse_decimal;
use ember_common::{TypeKind, Value};
use num_rational::BigRational;
use num_traits::ToPrimitive;

use crate::error::Fault;

// 2^63 as f64; every float strictly below it and at or above -2^63 fits in i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Convert `value` to `target`.
pub fn cast(value: &Value, target: &TypeKind) -> Result<Value, Fault> {
    let invalid = || Fault::InvalidCast {
        value: describe(value),
        target: target.to_string(),
    };
    match (target, value) {
        (TypeKind::Any, _) => Ok(value.clone()),

        (TypeKind::Int, Value::Int(v)) => Ok(Value::Int(*v)),
        (TypeKind::Int, Value::Float(v)) => float_to_int(*v).map(Value::Int).ok_or_else(invalid),
        (TypeKind::Int, Value::Decimal(v)) => {
            decimal_to_int(v).map(Value::Int).ok_or_else(invalid)
        }
        (TypeKind::Int, Value::Str(s)) => s.parse().map(Value::Int).map_err(|_| invalid()),

        (TypeKind::Float, Value::Int(v)) => Ok(Value::Float(*v as f64)),
        (TypeKind::Float, Value::Float(v)) => Ok(Value::Float(*v)),
        (TypeKind::Float, Value::Decimal(v)) => v.to_f64().map(Value::Float).ok_or_else(invalid),
        (TypeKind::Float, Value::Str(s)) => {
            parse_decimal(s).map_err(|_| invalid())?;
            s.parse().map(Value::Float).map_err(|_| invalid())
        }

        (TypeKind::Decimal, Value::Int(v)) => {
            Ok(Value::Decimal(BigRational::from_integer((*v).into())))
        }
        (TypeKind::Decimal, Value::Float(v)) => BigRational::from_float(*v)
            .map(Value::Decimal)
            .ok_or_else(invalid),
        (TypeKind::Decimal, Value::Decimal(v)) => Ok(Value::Decimal(v.clone())),
        (TypeKind::Decimal, Value::Str(s)) => {
            parse_decimal(s).map(Value::Decimal).map_err(|_| invalid())
        }

        (TypeKind::Bool, Value::Bool(_))
        | (TypeKind::String, Value::Str(_))
        | (TypeKind::Nil, Value::Nil)
        | (TypeKind::Array(_), Value::Array(_)) => Ok(value.clone()),

        _ => Err(invalid()),
    }
}

/// Truncate toward zero. `None` for NaN, infinities and out-of-range values.
fn float_to_int(v: f64) -> Option<i64> {
    if !v.is_finite() {
        return None;
    }
    let truncated = v.trunc();
    (-I64_BOUND..I64_BOUND)
        .contains(&truncated)
        .then_some(truncated as i64)
}

/// Exact integral decimals whose magnitude fits in 63 bits.
fn decimal_to_int(v: &BigRational) -> Option<i64> {
    if !v.is_integer() || v.numer().bits() > 63 {
        return None;
    }
    v.numer().to_i64()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Str(s) => format!("string {s:?}"),
        other => format!("{} {other}", other.kind_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::ArrayRef;
    use num_bigint::BigInt;

    fn dec(n: i64, d: i64) -> Value {
        Value::Decimal(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    fn is_invalid(result: Result<Value, Fault>) -> bool {
        matches!(result, Err(Fault::InvalidCast { .. }))
    }

    #[test]
    fn any_is_identity() {
        let array = Value::Array(ArrayRef::new(TypeKind::Int, vec![]));
        assert_eq!(cast(&array, &TypeKind::Any), Ok(array));
        assert_eq!(cast(&Value::Nil, &TypeKind::Any), Ok(Value::Nil));
    }

    #[test]
    fn float_to_int_truncates() {
        assert_eq!(cast(&Value::Float(2.9), &TypeKind::Int), Ok(Value::Int(2)));
        assert_eq!(cast(&Value::Float(-2.9), &TypeKind::Int), Ok(Value::Int(-2)));
        assert_eq!(
            cast(&Value::Float(-9.223_372_036_854_776e18), &TypeKind::Int),
            Ok(Value::Int(i64::MIN))
        );
    }

    #[test]
    fn float_to_int_rejects_non_finite_and_large() {
        assert!(is_invalid(cast(&Value::Float(f64::NAN), &TypeKind::Int)));
        assert!(is_invalid(cast(&Value::Float(f64::INFINITY), &TypeKind::Int)));
        assert!(is_invalid(cast(&Value::Float(9.3e18), &TypeKind::Int)));
        assert!(is_invalid(cast(&Value::Float(9.223_372_036_854_776e18), &TypeKind::Int)));
    }

    #[test]
    fn decimal_to_int_requires_integral() {
        assert_eq!(cast(&dec(3, 1), &TypeKind::Int), Ok(Value::Int(3)));
        assert_eq!(cast(&dec(-6, 2), &TypeKind::Int), Ok(Value::Int(-3)));
        assert!(is_invalid(cast(&dec(3, 2), &TypeKind::Int)));
        let huge = Value::Decimal(BigRational::from_integer(BigInt::from(1u64 << 63)));
        assert!(is_invalid(cast(&huge, &TypeKind::Int)));
    }

    #[test]
    fn string_to_int() {
        assert_eq!(cast(&Value::from("-17"), &TypeKind::Int), Ok(Value::Int(-17)));
        assert!(is_invalid(cast(&Value::from("1.0"), &TypeKind::Int)));
        assert!(is_invalid(cast(&Value::from("twelve"), &TypeKind::Int)));
    }

    #[test]
    fn to_float() {
        assert_eq!(cast(&Value::Int(3), &TypeKind::Float), Ok(Value::Float(3.0)));
        assert_eq!(cast(&dec(1, 4), &TypeKind::Float), Ok(Value::Float(0.25)));
        assert_eq!(cast(&Value::from("2.5e1"), &TypeKind::Float), Ok(Value::Float(25.0)));
        assert!(is_invalid(cast(&Value::from("inf"), &TypeKind::Float)));
        assert!(is_invalid(cast(&Value::Bool(true), &TypeKind::Float)));
    }

    #[test]
    fn to_decimal() {
        assert_eq!(cast(&Value::Int(-4), &TypeKind::Decimal), Ok(dec(-4, 1)));
        assert_eq!(cast(&Value::Float(0.5), &TypeKind::Decimal), Ok(dec(1, 2)));
        assert_eq!(cast(&Value::from("0.1"), &TypeKind::Decimal), Ok(dec(1, 10)));
        assert!(is_invalid(cast(&Value::Float(f64::NAN), &TypeKind::Decimal)));
        assert!(is_invalid(cast(&Value::from("1."), &TypeKind::Decimal)));
    }

    #[test]
    fn same_kind_only_targets() {
        assert_eq!(cast(&Value::Bool(true), &TypeKind::Bool), Ok(Value::Bool(true)));
        assert_eq!(cast(&Value::from("x"), &TypeKind::String), Ok(Value::from("x")));
        assert_eq!(cast(&Value::Nil, &TypeKind::Nil), Ok(Value::Nil));
        assert!(is_invalid(cast(&Value::Int(1), &TypeKind::Bool)));
        assert!(is_invalid(cast(&Value::Int(1), &TypeKind::String)));
        assert!(is_invalid(cast(&Value::Int(0), &TypeKind::Nil)));
        assert!(is_invalid(cast(&Value::Int(0), &TypeKind::array_of(TypeKind::Int))));
        assert!(is_invalid(cast(&Value::Nil, &TypeKind::Int)));
    }

    #[test]
    fn invalid_cast_message() {
        assert_eq!(
            cast(&Value::Float(f64::NAN), &TypeKind::Int)
                .unwrap_err()
                .to_string(),
            "cannot cast float NaN to int"
        );
        assert_eq!(
            cast(&Value::from("x"), &TypeKind::Int).unwrap_err().to_string(),
            "cannot cast string \"x\" to int"
        );
    }
}
