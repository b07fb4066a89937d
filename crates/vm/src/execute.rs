//! The basic-block walk and instruction dispatch.

use ember_common::value::MAX_ARRAY_LEN;
use ember_common::{
    ArrayRef, BlockId, CallSite, CompiledFunction, Instruction, Operand, Terminator, TypeKind,
    Value,
};
use tracing::{debug, trace};

use crate::arith;
use crate::cast;
use crate::error::Fault;
use crate::frame::Frame;
use crate::machine::Executor;
use crate::registry::Binding;

impl<'r> Executor<'r> {
    /// Run `function` with `args` and return the value left in slot 0.
    pub fn invoke(&mut self, function: &CompiledFunction, args: Vec<Value>) -> Result<Value, Fault> {
        debug!(function = %function.name, args = args.len(), depth = self.stack.depth(), "enter");
        self.stack.push(function.name.as_str());
        let mut frame = Frame::new(function, args)?;
        let mut current = BlockId::ENTRY;

        loop {
            let block = function.block(current).ok_or(Fault::InvalidBlock {
                block: current.index(),
                blocks: function.blocks.len(),
            })?;
            for instruction in &block.instructions {
                self.execute(&mut frame, instruction)?;
            }

            let next = match &block.terminator {
                Terminator::Goto(next) => *next,
                Terminator::Branch {
                    condition,
                    on_true,
                    on_false,
                } => match frame.get_ref(*condition)? {
                    Value::Bool(true) => *on_true,
                    Value::Bool(false) => *on_false,
                    other => return Err(Fault::mismatch("bool", other.kind_name())),
                },
                Terminator::Call(site) => {
                    self.call(&mut frame, site)?;
                    site.next
                }
                Terminator::Return => break,
            };
            trace!(function = %function.name, from = %current, to = %next, "block transition");
            current = next;
        }

        self.stack.pop()?;
        let result = frame.into_return_value();
        debug!(function = %function.name, result = %result, "exit");
        Ok(result)
    }

    fn call(&mut self, frame: &mut Frame, site: &CallSite) -> Result<(), Fault> {
        let args = site
            .args
            .iter()
            .map(|arg| frame.get(*arg))
            .collect::<Result<Vec<_>, _>>()?;

        let registry = self.registry;
        let result = match registry.resolve_call(site)? {
            Binding::Compiled(callee) => self.invoke(callee, args)?,
            Binding::Native(native) => self.call_native(&site.key, native.as_ref(), &args)?,
        };

        if let Some(dest) = site.dest {
            frame.set(dest, result)?;
        }
        Ok(())
    }

    /// Execute one non-terminating instruction against `frame`.
    pub(crate) fn execute(&mut self, frame: &mut Frame, instruction: &Instruction) -> Result<(), Fault> {
        match instruction {
            Instruction::ConstantLoad { dest, value } => frame.set(*dest, value.clone()),
            Instruction::Move { dest, src } => {
                let value = frame.get(*src)?;
                frame.set(*dest, value)
            }
            Instruction::NewArray {
                dest,
                element,
                size,
                values,
            } => {
                let array = new_array(frame, element, *size, values)?;
                frame.set(*dest, Value::Array(array))
            }
            Instruction::ArrayLoad { dest, array, index } => {
                let value = array_load(frame, *array, *index)?;
                frame.set(*dest, value)
            }
            Instruction::ArrayStore {
                array,
                index,
                value,
            } => array_store(frame, *array, *index, *value),
            Instruction::BinaryOp { op, dest, lhs, rhs } => {
                let result = arith::binary(*op, frame.get_ref(*lhs)?, frame.get_ref(*rhs)?)?;
                frame.set(*dest, result)
            }
            Instruction::UnaryOp { op, dest, operand } => {
                let result = arith::unary(*op, frame.get_ref(*operand)?)?;
                frame.set(*dest, result)
            }
            Instruction::TypeCast { dest, src, target } => {
                let result = cast::cast(frame.get_ref(*src)?, target)?;
                frame.set(*dest, result)
            }
        }
    }
}

fn new_array(
    frame: &Frame,
    element: &TypeKind,
    size: Option<Operand>,
    values: &[Operand],
) -> Result<ArrayRef, Fault> {
    let size = match size {
        None => 0,
        Some(slot) => match frame.get_ref(slot)? {
            Value::Int(n) if *n < 0 || *n as u64 > MAX_ARRAY_LEN as u64 => {
                return Err(Fault::IndexOutOfBounds {
                    index: *n,
                    length: 0,
                })
            }
            Value::Int(n) => *n as usize,
            other => return Err(Fault::mismatch("int", other.kind_name())),
        },
    };

    let mut elements = values
        .iter()
        .map(|slot| frame.get(*slot))
        .collect::<Result<Vec<_>, _>>()?;
    while elements.len() < size {
        elements.push(element.default_value());
    }
    Ok(ArrayRef::new(element.clone(), elements))
}

fn array_operands(frame: &Frame, array: Operand, index: Operand) -> Result<(ArrayRef, i64), Fault> {
    let array = match frame.get_ref(array)? {
        Value::Array(array) => array.clone(),
        other => return Err(Fault::mismatch("array", other.kind_name())),
    };
    let index = match frame.get_ref(index)? {
        Value::Int(index) => *index,
        other => return Err(Fault::mismatch("int", other.kind_name())),
    };
    Ok((array, index))
}

fn array_load(frame: &Frame, array: Operand, index: Operand) -> Result<Value, Fault> {
    let (array, index) = array_operands(frame, array, index)?;
    usize::try_from(index)
        .ok()
        .and_then(|i| array.get(i))
        .ok_or(Fault::IndexOutOfBounds {
            index,
            length: array.len(),
        })
}

fn array_store(frame: &Frame, array: Operand, index: Operand, value: Operand) -> Result<(), Fault> {
    let (array, index) = array_operands(frame, array, index)?;
    let position = usize::try_from(index)
        .ok()
        .filter(|i| *i < MAX_ARRAY_LEN)
        .ok_or(Fault::IndexOutOfBounds {
            index,
            length: array.len(),
        })?;
    array.filling_set(position, frame.get(value)?);
    Ok(())
}
