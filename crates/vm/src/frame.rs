//! Per-activation slot storage.

use ember_common::{CompiledFunction, Operand, Value};

use crate::error::Fault;

/// Flat, index-addressed storage for one function activation.
///
/// Slot 0 holds the return value, the parameters follow it, then the
/// locals. Every slot starts at its declared type's default.
#[derive(Debug)]
pub struct Frame {
    slots: Vec<Value>,
}

impl Frame {
    /// Lay out a frame for `function`, storing `args` from slot 1 on.
    ///
    /// Missing arguments leave their slots at the default value.
    pub fn new(function: &CompiledFunction, args: Vec<Value>) -> Result<Self, Fault> {
        let capacity = function.slots.len().saturating_sub(1);
        if args.len() > capacity {
            return Err(Fault::ArityMismatch {
                function: function.name.clone(),
                expected: capacity,
                found: args.len(),
            });
        }

        let mut args = args.into_iter();
        let slots = function
            .slots
            .iter()
            .enumerate()
            .map(|(slot, kind)| match slot {
                0 => kind.default_value(),
                _ => args.next().unwrap_or_else(|| kind.default_value()),
            })
            .collect();
        Ok(Self { slots })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the frame has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrow the value in `slot`.
    pub fn get_ref(&self, slot: Operand) -> Result<&Value, Fault> {
        self.slots.get(slot.index()).ok_or(Fault::OutOfRange {
            slot: slot.index(),
            slots: self.slots.len(),
        })
    }

    /// Copy of the value in `slot`. Arrays are shared, not copied.
    pub fn get(&self, slot: Operand) -> Result<Value, Fault> {
        self.get_ref(slot).cloned()
    }

    /// Overwrite `slot`.
    pub fn set(&mut self, slot: Operand, value: Value) -> Result<(), Fault> {
        let slots = self.slots.len();
        let target = self.slots.get_mut(slot.index()).ok_or(Fault::OutOfRange {
            slot: slot.index(),
            slots,
        })?;
        *target = value;
        Ok(())
    }

    /// Consume the frame, yielding slot 0 (`nil` for a slotless function).
    pub fn into_return_value(self) -> Value {
        self.slots.into_iter().next().unwrap_or(Value::Nil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::TypeKind;

    fn function(slots: Vec<TypeKind>, param_count: usize) -> CompiledFunction {
        CompiledFunction::new("f", slots, param_count, vec![])
    }

    #[test]
    fn layout_return_args_locals() {
        let f = function(
            vec![TypeKind::String, TypeKind::Int, TypeKind::Float, TypeKind::Bool],
            2,
        );
        let frame = Frame::new(&f, vec![Value::Int(7), Value::Float(1.5)]).unwrap();
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.get(Operand(0)).unwrap(), Value::Str(String::new()));
        assert_eq!(frame.get(Operand(1)).unwrap(), Value::Int(7));
        assert_eq!(frame.get(Operand(2)).unwrap(), Value::Float(1.5));
        assert_eq!(frame.get(Operand(3)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn missing_args_default() {
        let f = function(vec![TypeKind::Int, TypeKind::Int], 1);
        let frame = Frame::new(&f, vec![]).unwrap();
        assert_eq!(frame.get(Operand(1)).unwrap(), Value::Int(0));
    }

    #[test]
    fn too_many_args() {
        let f = function(vec![TypeKind::Int, TypeKind::Int], 1);
        let err = Frame::new(&f, vec![Value::Int(1), Value::Int(2)]).unwrap_err();
        assert_eq!(
            err,
            Fault::ArityMismatch {
                function: "f".into(),
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn out_of_range_access() {
        let f = function(vec![TypeKind::Int], 0);
        let mut frame = Frame::new(&f, vec![]).unwrap();
        assert_eq!(
            frame.get(Operand(1)),
            Err(Fault::OutOfRange { slot: 1, slots: 1 })
        );
        assert_eq!(
            frame.set(Operand(5), Value::Nil),
            Err(Fault::OutOfRange { slot: 5, slots: 1 })
        );
    }

    #[test]
    fn return_value_is_slot_zero() {
        let f = function(vec![TypeKind::Int, TypeKind::Int], 1);
        let mut frame = Frame::new(&f, vec![Value::Int(3)]).unwrap();
        frame.set(Operand(0), Value::Int(42)).unwrap();
        assert_eq!(frame.into_return_value(), Value::Int(42));

        let empty = Frame::new(&function(vec![], 0), vec![]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.into_return_value(), Value::Nil);
    }
}
