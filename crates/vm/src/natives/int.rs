//! `ember/lang.int`: integer helpers.

use ember_common::Value;

use super::{arg, wrong_kind, STANDARD_ORG};
use crate::error::Fault;
use crate::registry::Registry;

pub fn install(registry: &mut Registry) {
    registry.register_extern_function(STANDARD_ORG, "lang.int", "toHexString", to_hex_string);
}

/// Lowercase hex; negative values are the magnitude prefixed with `-`.
fn to_hex_string(args: &[Value]) -> Result<Value, Fault> {
    const NAME: &str = "lang.int:toHexString";
    match arg(NAME, args, 0)? {
        Value::Int(n) if *n < 0 => Ok(Value::Str(format!("-{:x}", n.unsigned_abs()))),
        Value::Int(n) => Ok(Value::Str(format!("{n:x}"))),
        other => Err(wrong_kind(NAME, "int", other)),
    }
}
