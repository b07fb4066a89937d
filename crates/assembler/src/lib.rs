//! Ember assembler: bidirectional text ↔ IR translation.
//!
//! The assembler is a mechanical translation of the line-oriented IR text
//! into a [`CompiledPackage`]. No optimization, no sugar.
//!
//! # Usage
//!
//! ```
//! use ember_assembler::{assemble, disassemble};
//!
//! let text = "package acme/demo\n\nfunc main() -> int\nbb0:\n  %0 = const 42\n  return\nend\n";
//! let package = assemble(text).unwrap();
//! assert_eq!(disassemble(&package), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(&disassemble(package)) == package` holds for every package
//! the verifier accepts whose constants are not arrays. The disassembler
//! outputs canonical text; the assembler also accepts comments, blank
//! lines and free spacing.

pub mod error;

mod disassembler;
mod hash;
mod lexer;
mod parser;

pub use disassembler::{disassemble, disassemble_function};
pub use error::AsmError;
pub use hash::fingerprint;

use ember_common::CompiledPackage;
use lexer::tokenize_line;
use parser::PackageParser;

/// Assemble text into a package.
///
/// Returns the first error encountered. Fix one error at a time.
pub fn assemble(text: &str) -> Result<CompiledPackage, AsmError> {
    let mut parser = PackageParser::default();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        parser.line(&tokens, line_num)?;
    }

    parser.finish()
}
