//! Command-line front end for the schema-to-IR compiler.
//!
//! Control flow for one invocation: dispatch the argument vector onto
//! the `compile` subcommand, build the validated configuration, invoke
//! the compiler, and translate failures into diagnostics on the error
//! stream. Clean-tier failures are printed and the process exits
//! nonzero; internal-tier failures propagate out of `main` so the full
//! chain is surfaced.

mod args;
mod report;

use std::env;
use std::process;

use schema_ir_compiler::{CompileError, ValidationError};

use crate::args::{Cli, Command, CompileArgs, DispatchError};

fn main() -> Result<(), CompileError> {
    let cli: Cli = match args::dispatch(env::args_os().collect()) {
        Ok(cli) => cli,
        Err(DispatchError::Usage(usage)) => {
            eprintln!("{usage}");
            process::exit(2);
        }
        Err(DispatchError::Parse(err)) => err.exit(),
    };

    match cli.command {
        Command::Compile(compile) => run_compile(compile),
    }
}

fn run_compile(compile: CompileArgs) -> Result<(), CompileError> {
    let configuration = match compile.configuration() {
        Ok(configuration) => configuration,
        Err(err) => fail(&err.to_string()),
    };

    // Checked here rather than at configuration build time so that
    // configurations stay comparable without touching the filesystem
    // for this rule. Must run before anything could write the artifact.
    if configuration.output_ir_file().is_dir() {
        fail(&ValidationError::OutputIsDirectory.to_string());
    }

    match schema_ir_compiler::compile(&configuration) {
        Ok(()) => Ok(()),
        Err(err) => match report::render(&err) {
            Some(diagnostic) => {
                eprint!("{diagnostic}");
                process::exit(1);
            }
            None => Err(err),
        },
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}
