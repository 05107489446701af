//! Compilation failure kinds.
//!
//! [`CompileError`] is the complete, closed set of ways a compile
//! invocation can fail. Callers classify failures by matching variants,
//! never by inspecting message text: the first three variants carry
//! enough structure to render a user-facing diagnostic, while
//! [`CompileError::Syntax`] and [`CompileError::Io`] are the internal
//! tier that front ends are expected to propagate unmodified.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolve::{ResolveError, SemanticError};

/// A failed compile invocation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// One input file referenced something that cannot be resolved.
    ///
    /// Reported per file: the front end renders the offending path and
    /// the cause message on separate lines.
    #[error("error in file '{}': {cause}", .file.display())]
    FileParse {
        /// The input file the failure was detected in.
        file: PathBuf,
        /// The user-meaningful reason resolution failed.
        cause: ResolveError,
    },

    /// A single declared type violates a local structural rule.
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// Two declared or imported types share a qualified name.
    ///
    /// `known` holds every qualified name registered up to and
    /// including the conflict, in discovery order.
    #[error("duplicate name: {name}")]
    DuplicateName {
        /// The qualified name that was declared twice.
        name: String,
        /// All names seen so far, ending with the duplicate.
        known: Vec<String>,
    },

    /// An input file could not be decoded as a schema document.
    ///
    /// Internal tier: the underlying decoder error is preserved as the
    /// source so the full chain surfaces to the operator.
    #[error("failed to decode schema file '{}'", .file.display())]
    Syntax {
        /// The undecodable input file.
        file: PathBuf,
        /// The decoder failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// Filesystem failure while reading inputs or writing the artifact.
    ///
    /// Internal tier.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The IR document could not be serialized.
    ///
    /// Internal tier.
    #[error("failed to serialize IR document")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeName;

    #[test]
    fn test_file_parse_cause_display_names_the_reference() {
        let err = CompileError::FileParse {
            file: PathBuf::from("api.yml"),
            cause: ResolveError::UnknownLocalReference(TypeName::new("UnknownType")),
        };
        let CompileError::FileParse { cause, .. } = &err else {
            unreachable!();
        };
        assert_eq!(
            cause.to_string(),
            "Unknown LocalReferenceType: TypeName{name=UnknownType}"
        );
    }

    #[test]
    fn test_io_errors_convert_via_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CompileError = io.into();
        assert!(matches!(err, CompileError::Io(_)));
    }
}
