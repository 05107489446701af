//! IR document model and emission.
//!
//! The IR artifact is a single JSON document: a format version, every
//! resolved type definition in discovery order, and the opaque
//! extensions mapping forwarded from the invocation. Emission
//! serializes the whole document in memory and writes it with a single
//! `fs::write`, so no failure path can leave a partial artifact.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::CompileError;
use crate::types::Type;

/// Version of the IR format emitted by this compiler.
pub const IR_FORMAT_VERSION: u32 = 1;

/// The complete IR artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrDocument {
    /// IR format version.
    pub version: u32,
    /// Resolved type definitions in discovery order.
    pub types: Vec<IrType>,
    /// Extensions forwarded opaquely from the invocation.
    pub extensions: BTreeMap<String, String>,
}

/// One resolved, qualified type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrType {
    /// Qualified name (`package.LocalName`).
    pub name: String,
    #[serde(flatten)]
    pub kind: IrTypeKind,
}

/// The shape of a resolved definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IrTypeKind {
    Alias { target: Type },
    Object { fields: Vec<IrField> },
    Union { members: Vec<IrField> },
    Enum { values: Vec<String> },
}

/// A named member of an object or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Type,
}

impl IrDocument {
    pub fn new(types: Vec<IrType>, extensions: BTreeMap<String, String>) -> Self {
        IrDocument {
            version: IR_FORMAT_VERSION,
            types,
            extensions,
        }
    }

    /// Serializes the document and writes it to `path` in one shot.
    pub fn write(&self, path: &Path) -> Result<(), CompileError> {
        let raw = serde_json::to_vec_pretty(self)?;
        fs::write(path, raw)?;
        debug!(path = %path.display(), types = self.types.len(), "wrote IR artifact");
        Ok(())
    }
}
