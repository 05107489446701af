//! Argument parsing and subcommand dispatch.
//!
//! Exactly one subcommand, `compile`, is recognized. Parsing is
//! forward-compatible: unknown `--flags` are tolerated (stripped and
//! the parse retried) so older binaries can process newer invocation
//! templates, while unrecognized subcommand or positional tokens are a
//! fatal usage error. Option values are held raw; validation happens
//! in [`CompileArgs::configuration`], keeping parse-time and
//! validation-time failures distinguishable.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Args, Parser, Subcommand};
use schema_ir_compiler::{Configuration, ValidationError};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "schema-ir")]
#[command(about = "Compile schema sources into an IR artifact")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a schema file or directory into an IR artifact.
    Compile(CompileArgs),
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Schema source file, or directory of schema sources.
    pub input: PathBuf,
    /// Destination path for the generated IR artifact.
    pub output: PathBuf,
    /// Flat JSON object of string keys to string values, forwarded
    /// opaquely into the IR.
    #[arg(long)]
    pub extensions: Option<String>,
}

impl CompileArgs {
    /// Validates the raw option values into a [`Configuration`].
    ///
    /// Performs the directory listing for input resolution; no other
    /// file I/O happens here.
    pub fn configuration(&self) -> Result<Configuration, ValidationError> {
        Configuration::builder(&self.input, &self.output)
            .raw_extensions(self.extensions.clone())
            .build()
    }
}

/// Fatal parse failure: tokens that match no recognized subcommand or
/// positional slot.
#[derive(Debug, Error)]
#[error("Unmatched arguments: {}", .tokens.join(", "))]
pub struct UsageError {
    /// The offending tokens, quoted for display.
    pub tokens: Vec<String>,
}

impl UsageError {
    fn new(token: String) -> Self {
        UsageError {
            tokens: vec![format!("'{token}'")],
        }
    }
}

/// Outcome of dispatching an argument vector.
#[derive(Debug)]
pub enum DispatchError {
    /// Unmatched subcommand/positional tokens; reported by the caller.
    Usage(UsageError),
    /// Any other clap outcome (missing required arguments, `--help`,
    /// `--version`); rendered by clap itself.
    Parse(clap::Error),
}

/// Maps an argument vector onto the recognized subcommand set.
///
/// Unknown flags are removed and the parse retried; every retry
/// shrinks the vector, so the loop terminates. No file I/O occurs.
pub fn dispatch(argv: Vec<OsString>) -> Result<Cli, DispatchError> {
    let mut argv = argv;
    loop {
        let err = match Cli::try_parse_from(&argv) {
            Ok(cli) => return Ok(cli),
            Err(err) => err,
        };
        match err.kind() {
            ErrorKind::UnknownArgument => {
                let Some(token) = context_string(&err, ContextKind::InvalidArg) else {
                    return Err(DispatchError::Parse(err));
                };
                if !token.starts_with('-') {
                    return Err(DispatchError::Usage(UsageError::new(token)));
                }
                // Tolerated unknown flag: drop it (and any `=`-joined
                // value) and retry.
                let flag = token
                    .split_once('=')
                    .map(|(flag, _)| flag.to_string())
                    .unwrap_or_else(|| token.clone());
                let before = argv.len();
                argv.retain(|arg| {
                    let arg = arg.to_string_lossy();
                    arg != token && arg != flag && !arg.starts_with(&format!("{flag}="))
                });
                if argv.len() == before {
                    return Err(DispatchError::Parse(err));
                }
            }
            ErrorKind::InvalidSubcommand => {
                let Some(token) = context_string(&err, ContextKind::InvalidSubcommand) else {
                    return Err(DispatchError::Parse(err));
                };
                return Err(DispatchError::Usage(UsageError::new(token)));
            }
            _ => return Err(DispatchError::Parse(err)),
        }
    }
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind) {
        Some(ContextValue::String(value)) => Some(value.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn argv(args: &[&str]) -> Vec<OsString> {
        std::iter::once("schema-ir")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    fn compile_args(args: &[&str]) -> Result<CompileArgs, DispatchError> {
        dispatch(argv(args)).map(|cli| {
            let Command::Compile(compile) = cli.command;
            compile
        })
    }

    #[test]
    fn test_correctly_parses_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("api.yml");
        fs::write(&input, "package: test.api\n").unwrap();
        let output = dir.path().join("ir.json");

        let args = compile_args(&[
            "compile",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--extensions",
            r#"{"foo": "bar"}"#,
        ])
        .unwrap();
        let configuration = args.configuration().unwrap();

        let expected = Configuration::builder(&input, &output)
            .raw_extensions(Some(r#"{"foo": "bar"}"#.to_string()))
            .build()
            .unwrap();
        assert_eq!(configuration, expected);
        assert_eq!(
            configuration.extensions().get("foo").map(String::as_str),
            Some("bar")
        );
    }

    #[test]
    fn test_discovers_files_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        fs::create_dir(&inputs).unwrap();
        let input = inputs.join("api.yml");
        fs::write(&input, "package: test.api\n").unwrap();
        let output = dir.path().join("ir.json");

        let args =
            compile_args(&["compile", inputs.to_str().unwrap(), output.to_str().unwrap()])
                .unwrap();
        let configuration = args.configuration().unwrap();

        assert_eq!(configuration.input_files(), [input]);
        assert_eq!(configuration.output_ir_file(), output);
        assert!(configuration.extensions().is_empty());
    }

    #[test]
    fn test_unrecognized_subcommand_is_unmatched_arguments() {
        let err = compile_args(&["compiles", "in", "out"]).unwrap_err();
        let DispatchError::Usage(usage) = err else {
            panic!("expected usage error");
        };
        assert!(usage.to_string().contains("Unmatched arguments"));
        assert!(usage.to_string().contains("compiles"));
    }

    #[test]
    fn test_extra_positional_is_unmatched_arguments() {
        let err = compile_args(&["compile", "in", "out", "extra"]).unwrap_err();
        let DispatchError::Usage(usage) = err else {
            panic!("expected usage error");
        };
        assert!(usage.to_string().contains("Unmatched arguments"));
        assert!(usage.to_string().contains("extra"));
    }

    #[test]
    fn test_unknown_flag_is_tolerated() {
        let args = compile_args(&["compile", "in", "out", "--foo"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in"));
        assert_eq!(args.output, PathBuf::from("out"));
    }

    #[test]
    fn test_unknown_flag_with_joined_value_is_tolerated() {
        let args =
            compile_args(&["compile", "in", "out", "--foo=bar", "--extensions", "{}"]).unwrap();
        assert_eq!(args.extensions.as_deref(), Some("{}"));
    }

    #[test]
    fn test_invalid_extensions_fail_at_validation_not_parse() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("api.yml");
        fs::write(&input, "package: test.api\n").unwrap();
        let output = dir.path().join("ir.json");

        // Parse succeeds with the malformed value held raw.
        let args = compile_args(&[
            "compile",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--extensions",
            "foo",
        ])
        .unwrap();
        let err = args.configuration().unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse extensions");
    }
}
