//! Two-tier diagnostic rendering.
//!
//! Compilation failures split into a clean tier — rendered as terse,
//! single-purpose messages on the error stream — and an internal tier
//! that is not rendered here at all: those propagate unmodified so the
//! full failure chain stays visible when the compiler itself is at
//! fault. Classification is a match over the closed [`CompileError`]
//! set; message text is never inspected.

use std::fmt::Write as _;

use schema_ir_compiler::CompileError;

/// Renders the clean-tier diagnostic for a failure, or `None` when the
/// failure belongs to the internal tier and must be propagated.
pub fn render(err: &CompileError) -> Option<String> {
    match err {
        CompileError::FileParse { file, cause } => Some(format!(
            "Encountered error trying to parse file '{}'\n{cause}\n",
            file.display()
        )),
        CompileError::Semantic(semantic) => {
            Some(format!("{}\n", semantic.to_string().trim()))
        }
        CompileError::DuplicateName { name, known } => {
            let mut out = String::from(
                "Type names must be unique across locally defined and imported types:\n",
            );
            let _ = writeln!(out, "Found duplicate name: {name}");
            out.push_str("Known names:\n");
            for known_name in known {
                let _ = writeln!(out, " - {known_name}");
            }
            Some(out)
        }
        CompileError::Syntax { .. } | CompileError::Io(_) | CompileError::Serialize(_) => None,
    }
}
