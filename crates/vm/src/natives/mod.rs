//! Standard native modules.
//!
//! Each submodule installs its functions under the `ember` org:
//! `ember/io`, `ember/lang.array` and `ember/lang.int`.

pub mod array;
pub mod int;
pub mod io;

use ember_common::Value;

use crate::error::Fault;
use crate::registry::Registry;
use crate::runtime::SharedWriter;

/// Org every standard module is registered under.
pub const STANDARD_ORG: &str = "ember";

/// Install all standard modules. `io:println` writes to `output`.
pub fn install_standard(registry: &mut Registry, output: SharedWriter) {
    io::install(registry, output);
    array::install(registry);
    int::install(registry);
}

/// The argument at `position`, or a native fault naming `function`.
pub(crate) fn arg<'a>(function: &str, args: &'a [Value], position: usize) -> Result<&'a Value, Fault> {
    args.get(position).ok_or_else(|| {
        Fault::Native(format!(
            "{function}: missing argument {}",
            position + 1
        ))
    })
}

/// Native fault for an argument of the wrong kind.
pub(crate) fn wrong_kind(function: &str, expected: &str, found: &Value) -> Fault {
    Fault::Native(format!(
        "{function}: expected {expected}, found {}",
        found.kind_name()
    ))
}
