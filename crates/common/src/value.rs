//! Runtime value representation for the Ember VM.
//!
//! Values are what live in frame slots during execution. Scalars are
//! copied on assignment; arrays are shared handles.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_rational::BigRational;

use crate::decimal::format_decimal;
use crate::type_kind::TypeKind;

/// Longest array the VM will grow to.
pub const MAX_ARRAY_LEN: usize = i32::MAX as usize;

/// Runtime value representation.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value.
    Nil,
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE 754 64-bit float.
    Float(f64),
    /// Arbitrary-precision rational.
    Decimal(BigRational),
    /// UTF-8 text.
    Str(String),
    /// Boolean value.
    Bool(bool),
    /// Shared handle to a resizable array.
    Array(ArrayRef),
}

impl Value {
    /// Short name of this value's kind, used in fault messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
        }
    }

    /// Returns true for [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<BigRational> for Value {
    fn from(v: BigRational) -> Self {
        Value::Decimal(v)
    }
}

// Host-side equality, used by tests and by IR comparison. Floats compare
// by bit pattern so `Value` can be `Eq`; arrays compare by identity first
// and then element-wise. The language's own `==` lives in the VM.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        host_eq(self, other, &mut Vec::new())
    }
}

fn host_eq(lhs: &Value, rhs: &Value, visiting: &mut Vec<(*const (), *const ())>) -> bool {
    match (lhs, rhs) {
        (Value::Nil, Value::Nil) => true,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
        (Value::Decimal(a), Value::Decimal(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            if a.ptr_eq(b) {
                return true;
            }
            // A pair already under comparison is assumed equal.
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
                .all(|(x, y)| host_eq(x, y, visiting));
            visiting.pop();
            equal
        }
        _ => false,
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    /// Top-level display form: `nil` prints as empty text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut visiting = Vec::new();
        f.write_str(&render(self, &mut visiting, true))
    }
}

fn render(value: &Value, visiting: &mut Vec<*const ()>, top_level: bool) -> String {
    match value {
        Value::Nil if top_level => String::new(),
        Value::Nil => "null".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => format_float(*v),
        Value::Decimal(v) => format_decimal(v),
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Array(array) => {
            let id = array.as_ptr();
            if visiting.contains(&id) {
                return "[...]".to_string();
            }
            visiting.push(id);
            let parts: Vec<String> = array
                .to_vec()
                .iter()
                .map(|element| render(element, visiting, false))
                .collect();
            visiting.pop();
            format!("[{}]", parts.join(","))
        }
    }
}

/// Float display form: integral values keep one fractional digit.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if v == v.trunc() {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Backing storage of an array value.
#[derive(Debug)]
pub struct ArrayData {
    /// Declared element type; its default is the filling value.
    pub element: TypeKind,
    /// The elements, in index order.
    pub elements: Vec<Value>,
}

/// A shared, mutable, identity-comparable handle to an array.
///
/// Cloning the handle shares the array: a store through one clone is
/// visible through every other. Mutation is single-threaded.
#[derive(Clone)]
pub struct ArrayRef(Rc<RefCell<ArrayData>>);

impl ArrayRef {
    /// Allocate a new array holding `elements`.
    pub fn new(element: TypeKind, elements: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(ArrayData { element, elements })))
    }

    /// Allocate an array of `len` filling values.
    pub fn filled(element: TypeKind, len: usize) -> Self {
        let elements = (0..len).map(|_| element.default_value()).collect();
        Self::new(element, elements)
    }

    /// The declared element type.
    pub fn element_kind(&self) -> TypeKind {
        self.0.borrow().element.clone()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.borrow().elements.len()
    }

    /// Returns true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().elements.get(index).cloned()
    }

    /// Store `value` at `index`, growing the array with filling values
    /// when `index` is past the end. Callers bound `index` by
    /// [`MAX_ARRAY_LEN`].
    pub fn filling_set(&self, index: usize, value: Value) {
        let mut data = self.0.borrow_mut();
        if index >= data.elements.len() {
            let filler = data.element.clone();
            while data.elements.len() < index {
                data.elements.push(filler.default_value());
            }
            data.elements.push(value);
        } else {
            data.elements[index] = value;
        }
    }

    /// Append values at the end.
    pub fn push(&self, values: impl IntoIterator<Item = Value>) {
        self.0.borrow_mut().elements.extend(values);
    }

    /// A snapshot of the elements. Nested arrays stay shared.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().elements.clone()
    }

    /// Returns true if both handles refer to the same array.
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the backing storage, stable for the array's lifetime.
    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }
}

impl fmt::Debug for ArrayRef {
    // Arrays may contain themselves, so only the shape is printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRef")
            .field("element", &self.element_kind())
            .field("len", &self.len())
            .finish()
    }
}
