//! Qualified-name registry.
//!
//! Type names must be unique across everything locally declared and
//! everything imported, over the whole input set. The registry records
//! names in discovery order — files in input order, local declarations
//! before imports within a file — because the uniqueness diagnostic
//! renders the full list of names seen up to the conflict.

use std::collections::HashSet;

use tracing::debug;

use crate::def::SchemaFile;
use crate::error::CompileError;

/// All qualified type names discovered so far.
#[derive(Debug, Default)]
pub struct NameRegistry {
    order: Vec<String>,
    seen: HashSet<String>,
    locals: HashSet<String>,
}

impl NameRegistry {
    /// Registers every name declared or imported by the given files.
    pub fn from_files<'a>(
        files: impl IntoIterator<Item = &'a SchemaFile>,
    ) -> Result<Self, CompileError> {
        let mut registry = NameRegistry::default();
        for file in files {
            for (name, _) in &file.types {
                registry.register_local(format!("{}.{}", file.package, name))?;
            }
            for (package, names) in &file.imports {
                for name in names {
                    registry.register_import(format!("{package}.{name}"))?;
                }
            }
        }
        debug!(names = registry.order.len(), "registered qualified names");
        Ok(registry)
    }

    fn register_local(&mut self, qualified: String) -> Result<(), CompileError> {
        if !self.seen.insert(qualified.clone()) {
            // The first occurrence is already in `order`, so the
            // rendered list names the conflict exactly once.
            return Err(CompileError::DuplicateName {
                name: qualified,
                known: self.order.clone(),
            });
        }
        self.locals.insert(qualified.clone());
        self.order.push(qualified);
        Ok(())
    }

    fn register_import(&mut self, qualified: String) -> Result<(), CompileError> {
        if self.seen.contains(&qualified) {
            // Several files importing the same external type is not a
            // conflict; a name that is also declared locally is.
            if self.locals.contains(&qualified) {
                return Err(CompileError::DuplicateName {
                    name: qualified,
                    known: self.order.clone(),
                });
            }
            return Ok(());
        }
        self.seen.insert(qualified.clone());
        self.order.push(qualified);
        Ok(())
    }

    /// Whether a qualified name is registered.
    pub fn contains(&self, qualified: &str) -> bool {
        self.seen.contains(qualified)
    }
}
