//! Reference resolution and semantic validation.
//!
//! Resolution turns the raw type expressions of a [`SchemaFile`] into
//! fully qualified [`IrType`]s: every bare reference is qualified under
//! the file's package and checked against the name registry. Semantic
//! validation then enforces local structural rules over the resolved
//! set, currently the map-key rule.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::def::{SchemaFile, TypeDef};
use crate::error::CompileError;
use crate::ir::{IrField, IrType, IrTypeKind};
use crate::registry::NameRegistry;
use crate::types::{Primitive, Type, TypeName, TypeParseError, parse_type};

/// A per-file resolution failure with a user-meaningful cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A referenced type is neither declared locally nor imported.
    #[error("Unknown LocalReferenceType: {0}")]
    UnknownLocalReference(TypeName),

    /// A type expression could not be parsed.
    #[error(transparent)]
    UnparseableType(#[from] TypeParseError),
}

/// A declared type violating a local structural rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// A union member uses a map whose key type is not keyable.
    #[error("Illegal map key found in union {union} in member {member}")]
    IllegalUnionMapKey { union: String, member: String },

    /// An object field uses a map whose key type is not keyable.
    #[error("Illegal map key found in object {object} in field {field}")]
    IllegalObjectMapKey { object: String, field: String },

    /// An alias target uses a map whose key type is not keyable.
    #[error("Illegal map key found in alias {alias}")]
    IllegalAliasMapKey { alias: String },
}

/// Resolves one schema file against the registry.
///
/// Output order follows declaration order. References in the resolved
/// types are rewritten to their qualified names.
pub fn resolve_file(
    file: &SchemaFile,
    path: &Path,
    registry: &NameRegistry,
) -> Result<Vec<IrType>, CompileError> {
    let resolve = |raw: &str| -> Result<Type, CompileError> {
        let parsed = parse_type(raw).map_err(|err| CompileError::FileParse {
            file: path.to_path_buf(),
            cause: ResolveError::UnparseableType(err),
        })?;
        qualify(parsed, &file.package, registry).map_err(|cause| CompileError::FileParse {
            file: path.to_path_buf(),
            cause,
        })
    };

    let mut resolved = Vec::with_capacity(file.types.len());
    for (name, def) in &file.types {
        let kind = match def {
            TypeDef::Alias { alias } => IrTypeKind::Alias {
                target: resolve(alias)?,
            },
            TypeDef::Object { fields } => IrTypeKind::Object {
                fields: resolve_members(fields, &resolve)?,
            },
            TypeDef::Union { union } => IrTypeKind::Union {
                members: resolve_members(union, &resolve)?,
            },
            TypeDef::Enum { values } => IrTypeKind::Enum {
                values: values.clone(),
            },
        };
        resolved.push(IrType {
            name: format!("{}.{}", file.package, name),
            kind,
        });
    }
    debug!(file = %path.display(), types = resolved.len(), "resolved schema file");
    Ok(resolved)
}

fn resolve_members(
    members: &[(String, String)],
    resolve: &impl Fn(&str) -> Result<Type, CompileError>,
) -> Result<Vec<IrField>, CompileError> {
    members
        .iter()
        .map(|(name, raw)| {
            Ok(IrField {
                name: name.clone(),
                field_type: resolve(raw)?,
            })
        })
        .collect()
}

/// Rewrites references to qualified names, failing on unknown ones.
fn qualify(parsed: Type, package: &str, registry: &NameRegistry) -> Result<Type, ResolveError> {
    match parsed {
        Type::Reference { name } => {
            let qualified = if name.as_str().contains('.') {
                name.as_str().to_string()
            } else {
                format!("{package}.{}", name.as_str())
            };
            if !registry.contains(&qualified) {
                return Err(ResolveError::UnknownLocalReference(name));
            }
            Ok(Type::Reference {
                name: TypeName::new(qualified),
            })
        }
        Type::List { item } => Ok(Type::List {
            item: Box::new(qualify(*item, package, registry)?),
        }),
        Type::Set { item } => Ok(Type::Set {
            item: Box::new(qualify(*item, package, registry)?),
        }),
        Type::Optional { item } => Ok(Type::Optional {
            item: Box::new(qualify(*item, package, registry)?),
        }),
        Type::Map { key, value } => Ok(Type::Map {
            key: Box::new(qualify(*key, package, registry)?),
            value: Box::new(qualify(*value, package, registry)?),
        }),
        primitive @ Type::Primitive { .. } => Ok(primitive),
    }
}

/// Enforces the map-key rule over the full resolved type set.
///
/// A map key must be a keyable type: a primitive other than `binary`
/// or `any`, an enum reference, or an alias chain resolving to one of
/// those. Containers, objects, and unions are not keyable.
pub fn validate_types(types: &[IrType]) -> Result<(), SemanticError> {
    let by_name: HashMap<&str, &IrTypeKind> = types
        .iter()
        .map(|ir_type| (ir_type.name.as_str(), &ir_type.kind))
        .collect();

    for ir_type in types {
        match &ir_type.kind {
            IrTypeKind::Union { members } => {
                for member in members {
                    if has_illegal_map_key(&member.field_type, &by_name) {
                        return Err(SemanticError::IllegalUnionMapKey {
                            union: local_name(&ir_type.name).to_string(),
                            member: member.name.clone(),
                        });
                    }
                }
            }
            IrTypeKind::Object { fields } => {
                for field in fields {
                    if has_illegal_map_key(&field.field_type, &by_name) {
                        return Err(SemanticError::IllegalObjectMapKey {
                            object: local_name(&ir_type.name).to_string(),
                            field: field.name.clone(),
                        });
                    }
                }
            }
            IrTypeKind::Alias { target } => {
                if has_illegal_map_key(target, &by_name) {
                    return Err(SemanticError::IllegalAliasMapKey {
                        alias: local_name(&ir_type.name).to_string(),
                    });
                }
            }
            IrTypeKind::Enum { .. } => {}
        }
    }
    debug!(types = types.len(), "semantic validation passed");
    Ok(())
}

fn has_illegal_map_key(parsed: &Type, defs: &HashMap<&str, &IrTypeKind>) -> bool {
    match parsed {
        Type::Map { key, value } => {
            !is_keyable(key, defs, &mut HashSet::new())
                || has_illegal_map_key(key, defs)
                || has_illegal_map_key(value, defs)
        }
        Type::List { item } | Type::Set { item } | Type::Optional { item } => {
            has_illegal_map_key(item, defs)
        }
        Type::Primitive { .. } | Type::Reference { .. } => false,
    }
}

fn is_keyable<'a>(
    parsed: &'a Type,
    defs: &HashMap<&str, &'a IrTypeKind>,
    visiting: &mut HashSet<&'a str>,
) -> bool {
    match parsed {
        Type::Primitive { primitive } => {
            !matches!(primitive, Primitive::Binary | Primitive::Any)
        }
        Type::Reference { name } => {
            // Alias cycles terminate via the visiting set; imported
            // types have no local definition and are given the benefit
            // of the doubt.
            if !visiting.insert(name.as_str()) {
                return false;
            }
            match defs.get(name.as_str()) {
                Some(IrTypeKind::Enum { .. }) => true,
                Some(IrTypeKind::Alias { target }) => is_keyable(target, defs, visiting),
                Some(IrTypeKind::Object { .. }) | Some(IrTypeKind::Union { .. }) => false,
                None => true,
            }
        }
        Type::List { .. } | Type::Set { .. } | Type::Optional { .. } | Type::Map { .. } => false,
    }
}

fn local_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
