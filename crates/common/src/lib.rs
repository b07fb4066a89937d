//! Ember common types: the value model and the basic-block IR.
//!
//! - [`Value`] and [`ArrayRef`]: runtime values held in frame slots
//! - [`TypeKind`]: declared types of slots, array elements and cast targets
//! - [`Instruction`], [`Terminator`], [`CallSite`]: the contents of a block
//! - [`CompiledFunction`], [`CompiledPackage`]: the unit of execution and registration
//! - [`decimal`]: exact text conversion for decimal values

pub mod decimal;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod type_kind;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::ParseError;
pub use instruction::{BlockId, BoundTarget, CallSite, Instruction, Operand, Terminator};
pub use opcode::{BinaryOpKind, UnaryOpKind};
pub use program::{qualified_name, BasicBlock, CompiledFunction, CompiledPackage};
pub use type_kind::TypeKind;
pub use value::{ArrayRef, Value};

#[cfg(test)]
mod proptests {
    use super::*;
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use proptest::prelude::*;

    /// Strategy that generates a type kind up to two array levels deep.
    fn arb_type_kind() -> impl Strategy<Value = TypeKind> {
        let scalar = prop::sample::select(&type_kind::SCALAR_KINDS[..]);
        scalar.prop_recursive(2, 4, 1, |inner| inner.prop_map(TypeKind::array_of))
    }

    proptest! {
        /// Every type kind's name parses back to the same kind.
        #[test]
        fn type_names_parse(kind in arb_type_kind()) {
            prop_assert_eq!(kind.to_string().parse::<TypeKind>().unwrap(), kind);
        }

        /// Every default value is admitted by its own type.
        #[test]
        fn defaults_are_admitted(kind in arb_type_kind()) {
            prop_assert!(kind.admits(&kind.default_value()));
        }

        /// Decimal text with a terminating expansion is exact in both directions.
        #[test]
        fn decimal_text_is_exact(n in any::<i64>(), twos in 0u32..20, fives in 0u32..20) {
            let denom = BigInt::from(2u32).pow(twos) * BigInt::from(5u32).pow(fives);
            let value = BigRational::new(BigInt::from(n), denom);
            let text = decimal::format_decimal(&value);
            prop_assert_eq!(decimal::parse_decimal(&text).unwrap(), value);
        }

        /// Integral finite floats always display with a fractional part.
        #[test]
        fn integral_floats_keep_a_fraction(n in -1_000_000i64..1_000_000) {
            let text = Value::Float(n as f64).to_string();
            prop_assert!(text.ends_with(".0"), "{}", text);
        }

        /// Growing an array by a store fills every skipped index.
        #[test]
        fn filling_set_fills_gap(start in 0usize..8, index in 0usize..32) {
            let array = ArrayRef::filled(TypeKind::Int, start);
            array.filling_set(index, Value::Int(-1));
            prop_assert_eq!(array.len(), start.max(index + 1));
            for i in 0..array.len() {
                let expected = if i == index { Value::Int(-1) } else { Value::Int(0) };
                prop_assert_eq!(array.get(i), Some(expected));
            }
        }
    }
}
