//! Declared types for frame slots, array elements and cast targets.

use std::fmt;
use std::str::FromStr;

use num_rational::BigRational;
use num_traits::Zero;

use crate::error::ParseError;
use crate::value::{ArrayRef, Value};

/// The declared type of a slot, an array element, or a cast target.
///
/// The IR producer has already type-checked the program, so the VM only
/// needs enough type information to pick default values and to steer
/// `TypeCast`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The universal type. Casting to it is the identity.
    Any,
    /// The type whose only value is `nil`.
    Nil,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// IEEE 754 64-bit float.
    Float,
    /// Arbitrary-precision rational.
    Decimal,
    /// UTF-8 text.
    String,
    /// Resizable array with the given element type.
    Array(Box<TypeKind>),
}

/// All non-array kinds, in definition order.
pub const SCALAR_KINDS: [TypeKind; 7] = [
    TypeKind::Any,
    TypeKind::Nil,
    TypeKind::Bool,
    TypeKind::Int,
    TypeKind::Float,
    TypeKind::Decimal,
    TypeKind::String,
];

impl TypeKind {
    /// Shorthand for `TypeKind::Array(Box::new(element))`.
    pub fn array_of(element: TypeKind) -> Self {
        TypeKind::Array(Box::new(element))
    }

    /// The value a slot of this type holds before anything is stored in it.
    ///
    /// This is also the filling value used when an array of this element
    /// type grows. Every call to an array kind yields a fresh array.
    pub fn default_value(&self) -> Value {
        match self {
            TypeKind::Any | TypeKind::Nil => Value::Nil,
            TypeKind::Bool => Value::Bool(false),
            TypeKind::Int => Value::Int(0),
            TypeKind::Float => Value::Float(0.0),
            TypeKind::Decimal => Value::Decimal(BigRational::zero()),
            TypeKind::String => Value::Str(String::new()),
            TypeKind::Array(element) => {
                Value::Array(ArrayRef::new((**element).clone(), Vec::new()))
            }
        }
    }

    /// Returns true if `value` is a member of this type.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeKind::Any, _) => true,
            (TypeKind::Nil, Value::Nil)
            | (TypeKind::Bool, Value::Bool(_))
            | (TypeKind::Int, Value::Int(_))
            | (TypeKind::Float, Value::Float(_))
            | (TypeKind::Decimal, Value::Decimal(_))
            | (TypeKind::String, Value::Str(_)) => true,
            (TypeKind::Array(element), Value::Array(array)) => {
                **element == TypeKind::Any || **element == array.element_kind()
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Any => f.write_str("any"),
            TypeKind::Nil => f.write_str("nil"),
            TypeKind::Bool => f.write_str("bool"),
            TypeKind::Int => f.write_str("int"),
            TypeKind::Float => f.write_str("float"),
            TypeKind::Decimal => f.write_str("decimal"),
            TypeKind::String => f.write_str("string"),
            TypeKind::Array(element) => write!(f, "{element}[]"),
        }
    }
}

impl FromStr for TypeKind {
    type Err = ParseError;

    /// Parses `int`, `string[]`, `float[][]` and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(TypeKind::array_of(inner.parse()?));
        }
        SCALAR_KINDS
            .iter()
            .find(|kind| kind.to_string() == s)
            .cloned()
            .ok_or_else(|| ParseError::UnknownType(s.to_string()))
    }
}
