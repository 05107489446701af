//! Compile invocation configuration.
//!
//! A [`Configuration`] is the immutable, validated input to one compile
//! invocation: the resolved list of schema source files, the IR output
//! path, and an opaque extensions mapping. It is built once through
//! [`ConfigurationBuilder`] and compared by value, so front ends can
//! assert on configurations without touching the filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Invalid invocation inputs: well-formed arguments carrying values
/// that cannot produce a usable [`Configuration`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// `--extensions` was not a flat string-to-string JSON object.
    ///
    /// The message text is a stable contract.
    #[error("Failed to parse extensions")]
    MalformedExtensions,

    /// The input path names neither a file nor a directory.
    #[error("Input path '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    /// The input directory has no file children.
    #[error("No schema files found in '{}'", .0.display())]
    NoSchemaFiles(PathBuf),

    /// The output path currently names a directory.
    ///
    /// Raised by the compile step, not at configuration build time.
    #[error("Output IR file should not be a directory")]
    OutputIsDirectory,

    /// Directory listing failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Immutable inputs to one compile invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    input_files: Vec<PathBuf>,
    output_ir_file: PathBuf,
    extensions: BTreeMap<String, String>,
}

impl Configuration {
    /// Starts building a configuration from raw path arguments.
    pub fn builder(
        input_path: impl Into<PathBuf>,
        output_ir_file: impl Into<PathBuf>,
    ) -> ConfigurationBuilder {
        ConfigurationBuilder {
            input_path: input_path.into(),
            output_ir_file: output_ir_file.into(),
            raw_extensions: None,
        }
    }

    /// Schema source files in resolution order (never empty).
    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    /// Destination path for the IR artifact.
    pub fn output_ir_file(&self) -> &Path {
        &self.output_ir_file
    }

    /// Opaque extensions forwarded into the IR.
    pub fn extensions(&self) -> &BTreeMap<String, String> {
        &self.extensions
    }
}

/// Two-phase builder: raw values in, validated [`Configuration`] out.
///
/// Holding raw strings until [`build`](ConfigurationBuilder::build)
/// keeps parse-time and validation-time failures separately testable.
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    input_path: PathBuf,
    output_ir_file: PathBuf,
    raw_extensions: Option<String>,
}

impl ConfigurationBuilder {
    /// Sets the raw `--extensions` value, if one was supplied.
    pub fn raw_extensions(mut self, raw: Option<String>) -> Self {
        self.raw_extensions = raw;
        self
    }

    /// Validates and assembles the configuration.
    ///
    /// Deterministic and side-effect-free apart from the directory
    /// listing performed by input resolution. The output path is taken
    /// verbatim; whether it names a directory is checked later, at
    /// compile time.
    pub fn build(self) -> Result<Configuration, ValidationError> {
        let input_files = resolve_inputs(&self.input_path)?;
        let extensions = match self.raw_extensions {
            Some(raw) => parse_extensions(&raw)?,
            None => BTreeMap::new(),
        };
        Ok(Configuration {
            input_files,
            output_ir_file: self.output_ir_file,
            extensions,
        })
    }
}

/// Expands a path argument into a concrete list of schema files.
///
/// A regular file resolves to itself. A directory resolves to its
/// direct file children sorted lexicographically by name — nested
/// directories are not descended into and do not appear in the result.
/// The lexicographic order is a correctness requirement: platform
/// directory iteration order is not reproducible.
pub fn resolve_inputs(path: &Path) -> Result<Vec<PathBuf>, ValidationError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let mut files = Vec::new();
        for entry in fs::read_dir(path)? {
            let child = entry?.path();
            if child.is_file() {
                files.push(child);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        if files.is_empty() {
            return Err(ValidationError::NoSchemaFiles(path.to_path_buf()));
        }
        return Ok(files);
    }

    Err(ValidationError::InputNotFound(path.to_path_buf()))
}

/// Parses the `--extensions` value: a flat JSON object of string keys
/// to string values. Anything else — unstructured text, nested
/// objects, arrays, non-string values — is rejected. Duplicate keys
/// resolve last-write-wins.
pub fn parse_extensions(raw: &str) -> Result<BTreeMap<String, String>, ValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|_| ValidationError::MalformedExtensions)?;
    let serde_json::Value::Object(entries) = value else {
        return Err(ValidationError::MalformedExtensions);
    };
    entries
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(value) => Ok((key, value)),
            _ => Err(ValidationError::MalformedExtensions),
        })
        .collect()
}
