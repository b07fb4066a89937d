//! Ember CLI: assemble, verify, format, fingerprint and run IR files.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/assembly error
//! - 2: Verification failure
//! - 3: Runtime fault

mod commands;

use std::process;

fn main() {
    ember_cli::init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "check" => commands::check(&args[2..]),
        "run" => commands::run(&args[2..]),
        "fmt" => commands::fmt(&args[2..]),
        "hash" => commands::hash(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: ember <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  check <file.ir>                          Assemble and verify");
    eprintln!("  run <file.ir> [--entry NAME] [ARGS...]   Verify and execute (default entry: main)");
    eprintln!("  fmt <file.ir>                            Print canonical text");
    eprintln!("  hash <file.ir>                           Print function fingerprints");
    eprintln!();
    eprintln!("Logging: set {}=<filter> (default: warn)", ember_cli::LOG_ENV);
}
