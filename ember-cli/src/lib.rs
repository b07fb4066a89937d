//! Support code for the `ember` binary: logging setup and argument parsing.
//!
//! Kept in a library so the parsing rules are unit-testable without
//! spawning the binary.

use ember_common::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "EMBER_LOG";

/// Initialize logging to stderr.
///
/// `EMBER_LOG` takes `EnvFilter` directives (`debug`, `ember_vm=trace`, ...).
/// Default is `warn`, which reports runtime faults only.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Interpret a command-line argument as a runtime value.
///
/// Integers become `Int`, numbers with a fraction or exponent become
/// `Float`, everything else is passed through as `Str`.
pub fn parse_value(text: &str) -> Value {
    if let Ok(n) = text.parse::<i64>() {
        return Value::Int(n);
    }
    let numeric = text.contains(['.', 'e', 'E'])
        && text
            .trim_start_matches(['+', '-'])
            .starts_with(|c: char| c.is_ascii_digit() || c == '.');
    if numeric {
        if let Ok(n) = text.parse::<f64>() {
            return Value::Float(n);
        }
    }
    Value::Str(text.to_string())
}

/// Options of `ember run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub input: String,
    pub entry: String,
    pub args: Vec<Value>,
}

/// Parse `<file.ir> [--entry NAME] [ARGS...]`.
///
/// `--entry` may appear anywhere after the file; `--` ends option parsing
/// so later arguments are passed through even if they look like options.
pub fn parse_run_args(args: &[String]) -> Result<RunOptions, String> {
    let (input, rest) = args
        .split_first()
        .ok_or_else(|| "run requires an input file".to_string())?;

    let mut entry = ember_vm::ENTRY_FUNCTION.to_string();
    let mut values = Vec::new();
    let mut options_done = false;
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--" if !options_done => options_done = true,
            "--entry" if !options_done => {
                entry = iter
                    .next()
                    .ok_or_else(|| "--entry requires a function name".to_string())?
                    .clone();
            }
            other => values.push(parse_value(other)),
        }
    }

    Ok(RunOptions {
        input: input.clone(),
        entry,
        args: values,
    })
}
