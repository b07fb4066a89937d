//! Content fingerprints of compiled functions.

use ember_common::CompiledFunction;

use crate::disassembler::disassemble_function;

/// blake3 hash of the function's canonical text, hex-encoded.
///
/// Two functions share a fingerprint iff they disassemble identically, so
/// formatting and comments in the source text do not matter.
pub fn fingerprint(function: &CompiledFunction) -> String {
    blake3::hash(disassemble_function(function).as_bytes())
        .to_hex()
        .to_string()
}
