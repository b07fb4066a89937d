//! `ember/io`: console output.

use ember_common::Value;

use super::STANDARD_ORG;
use crate::error::Fault;
use crate::registry::Registry;
use crate::runtime::SharedWriter;

pub fn install(registry: &mut Registry, output: SharedWriter) {
    registry.register_extern_function(STANDARD_ORG, "io", "println", move |args| {
        println(&output, args)
    });
}

/// Write the display forms of `args`, space-separated, then a newline.
fn println(output: &SharedWriter, args: &[Value]) -> Result<Value, Fault> {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let mut out = output.borrow_mut();
    writeln!(out, "{line}")
        .and_then(|()| out.flush())
        .map_err(|e| Fault::Native(format!("io:println: {e}")))?;
    Ok(Value::Nil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use ember_common::{ArrayRef, TypeKind};

    #[test]
    fn println_joins_with_spaces() {
        let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
        let output: SharedWriter = buffer.clone();
        let array = ArrayRef::new(TypeKind::Int, vec![Value::Int(1), Value::Int(2)]);
        let result = println(
            &output,
            &[Value::from("x ="), Value::Float(1.0), Value::Array(array), Value::Nil],
        );
        assert_eq!(result, Ok(Value::Nil));
        assert_eq!(String::from_utf8(buffer.borrow().clone()).unwrap(), "x = 1.0 [1,2] \n");
    }

    #[test]
    fn println_without_args_prints_empty_line() {
        let buffer = Rc::new(RefCell::new(Vec::<u8>::new()));
        let output: SharedWriter = buffer.clone();
        println(&output, &[]).unwrap();
        assert_eq!(buffer.borrow().as_slice(), b"\n");
    }
}
