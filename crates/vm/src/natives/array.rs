//! `ember/lang.array`: array helpers.

use ember_common::{ArrayRef, Value};

use super::{arg, wrong_kind, STANDARD_ORG};
use crate::error::Fault;
use crate::registry::Registry;

pub fn install(registry: &mut Registry) {
    registry.register_extern_function(STANDARD_ORG, "lang.array", "push", push);
    registry.register_extern_function(STANDARD_ORG, "lang.array", "length", length);
}

fn array_arg<'a>(function: &str, args: &'a [Value]) -> Result<&'a ArrayRef, Fault> {
    match arg(function, args, 0)? {
        Value::Array(array) => Ok(array),
        other => Err(wrong_kind(function, "array", other)),
    }
}

/// Append every argument after the first to the array.
fn push(args: &[Value]) -> Result<Value, Fault> {
    let array = array_arg("lang.array:push", args)?;
    array.push(args[1..].iter().cloned());
    Ok(Value::Nil)
}

fn length(args: &[Value]) -> Result<Value, Fault> {
    let array = array_arg("lang.array:length", args)?;
    i64::try_from(array.len())
        .map(Value::Int)
        .map_err(|_| Fault::Native("lang.array:length: length exceeds int range".into()))
}
