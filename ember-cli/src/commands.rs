//! CLI command implementations.
//!
//! Each command returns `Err(code)` with the process exit code after
//! printing its diagnostics to stderr.

use std::fs;

use ember_common::CompiledPackage;
use ember_cli::parse_run_args;
use ember_vm::Runtime;
use tracing::debug;

/// Assemble and verify an IR file.
pub fn check(args: &[String]) -> Result<(), i32> {
    let input = require_input(args, "check")?;
    let package = read_package(input)?;
    verify(&package)?;
    println!("OK: {input} ({} functions)", package.functions.len());
    Ok(())
}

/// Assemble, verify and execute the entry function of an IR file.
pub fn run(args: &[String]) -> Result<(), i32> {
    let options = parse_run_args(args).map_err(|e| {
        eprintln!("error: {e}");
        eprintln!("Usage: ember run <file.ir> [--entry NAME] [ARGS...]");
        1
    })?;

    let package = read_package(&options.input)?;
    verify(&package)?;

    if package.function(&options.entry).is_none() {
        eprintln!(
            "error: no function '{}' in {}/{}",
            options.entry, package.org, package.module
        );
        return Err(1);
    }
    let key = package.qualified_name(&options.entry);

    let mut runtime = Runtime::new();
    runtime.register_package(package);
    match runtime.call(&key, options.args) {
        Ok(value) => {
            if !value.is_nil() {
                println!("{value}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Print the canonical text of an IR file.
pub fn fmt(args: &[String]) -> Result<(), i32> {
    let input = require_input(args, "fmt")?;
    let package = read_package(input)?;
    print!("{}", ember_assembler::disassemble(&package));
    Ok(())
}

/// Print one fingerprint per function.
pub fn hash(args: &[String]) -> Result<(), i32> {
    let input = require_input(args, "hash")?;
    let package = read_package(input)?;
    for function in &package.functions {
        println!(
            "{}  {}",
            ember_assembler::fingerprint(function),
            package.qualified_name(&function.name)
        );
    }
    Ok(())
}

// --- Helpers ---

fn require_input<'a>(args: &'a [String], command: &str) -> Result<&'a str, i32> {
    match args {
        [input] => Ok(input.as_str()),
        [] => {
            eprintln!("error: {command} requires an input file");
            eprintln!("Usage: ember {command} <file.ir>");
            Err(1)
        }
        [_, extra, ..] => {
            eprintln!("error: unexpected argument '{extra}'");
            Err(1)
        }
    }
}

/// Read and assemble an IR text file.
fn read_package(path: &str) -> Result<CompiledPackage, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    let package = ember_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {path}: {e}");
        1
    })?;
    debug!(path, functions = package.functions.len(), "assembled");
    Ok(package)
}

fn verify(package: &CompiledPackage) -> Result<(), i32> {
    ember_verifier::verify(package).map_err(|errors| {
        for e in &errors {
            eprintln!("error: {e}");
        }
        2
    })
}
