//! Schema-to-IR compiler.
//!
//! Turns a set of YAML schema source files into a single JSON
//! intermediate-representation artifact. The crate exposes a narrow
//! contract to front ends:
//!
//! - [`Configuration`] — the immutable, validated inputs to one
//!   invocation, assembled through [`ConfigurationBuilder`].
//! - [`compile`] — runs the full pipeline (load, register names,
//!   resolve references, validate, emit) and writes the artifact to
//!   `Configuration::output_ir_file` as a side effect.
//! - [`CompileError`] — the closed set of failure kinds. Front ends
//!   classify by variant; message text is never inspected.
//!
//! # Example
//!
//! ```no_run
//! use schema_ir_compiler::{Configuration, compile};
//!
//! let configuration = Configuration::builder("schemas/", "out/ir.json")
//!     .raw_extensions(Some(r#"{"recommended-product": "api-gateway"}"#.to_string()))
//!     .build()?;
//! compile(&configuration)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod def;
mod error;
mod ir;
mod registry;
mod resolve;
mod types;

use std::fs;

use tracing::debug;

pub use config::{
    Configuration, ConfigurationBuilder, ValidationError, parse_extensions, resolve_inputs,
};
pub use def::{SchemaFile, TypeDef};
pub use error::CompileError;
pub use ir::{IR_FORMAT_VERSION, IrDocument, IrField, IrType, IrTypeKind};
pub use resolve::{ResolveError, SemanticError};
pub use types::{Primitive, Type, TypeName, TypeParseError, parse_type};

use registry::NameRegistry;

/// Compiles the configured schema files into an IR artifact.
///
/// Strictly sequential: load every file, register qualified names,
/// resolve references per file, run semantic validation, then emit.
/// The artifact is written only after every stage has succeeded, so a
/// failure at any point leaves the output path untouched.
pub fn compile(configuration: &Configuration) -> Result<(), CompileError> {
    let mut files = Vec::with_capacity(configuration.input_files().len());
    for path in configuration.input_files() {
        let raw = fs::read_to_string(path)?;
        let file: SchemaFile =
            serde_yaml::from_str(&raw).map_err(|source| CompileError::Syntax {
                file: path.clone(),
                source,
            })?;
        files.push((path.clone(), file));
    }
    debug!(files = files.len(), "loaded schema files");

    let registry = NameRegistry::from_files(files.iter().map(|(_, file)| file))?;

    let mut types = Vec::new();
    for (path, file) in &files {
        types.extend(resolve::resolve_file(file, path, &registry)?);
    }

    resolve::validate_types(&types)?;

    let document = IrDocument::new(types, configuration.extensions().clone());
    document.write(configuration.output_ir_file())
}
