//! Type names and type expressions.
//!
//! A type expression in a schema source file is either a primitive, a
//! container (`list<T>`, `set<T>`, `optional<T>`, `map<K, V>`), or a
//! bare name referencing a type declared locally or imported. The
//! expression grammar is small enough for a hand-written
//! recursive-descent parser over a char cursor.

use std::fmt;

use serde::Serialize;

/// Name of a locally referenced type.
///
/// The `Display` form (`TypeName{name=…}`) is part of the diagnostic
/// contract for unresolved references and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        TypeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName{{name={}}}", self.0)
    }
}

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Integer,
    Double,
    Boolean,
    Binary,
    Any,
    Uuid,
}

impl Primitive {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Primitive::String),
            "integer" => Some(Primitive::Integer),
            "double" => Some(Primitive::Double),
            "boolean" => Some(Primitive::Boolean),
            "binary" => Some(Primitive::Binary),
            "any" => Some(Primitive::Any),
            "uuid" => Some(Primitive::Uuid),
            _ => None,
        }
    }
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Type {
    Primitive { primitive: Primitive },
    List { item: Box<Type> },
    Set { item: Box<Type> },
    Optional { item: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    Reference { name: TypeName },
}

/// Malformed type expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unparseable type: {raw}")]
pub struct TypeParseError {
    /// The full expression that failed to parse.
    pub raw: String,
}

/// Parses a type expression such as `map<string, list<UserId>>`.
pub fn parse_type(raw: &str) -> Result<Type, TypeParseError> {
    let mut cursor = Cursor::new(raw);
    let parsed = cursor.parse()?;
    cursor.skip_whitespace();
    if cursor.at_end() {
        Ok(parsed)
    } else {
        Err(cursor.fail())
    }
}

struct Cursor<'a> {
    raw: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(raw: &'a str) -> Self {
        Cursor { raw, rest: raw }
    }

    fn parse(&mut self) -> Result<Type, TypeParseError> {
        self.skip_whitespace();
        let name = self.take_name()?;
        self.skip_whitespace();

        if !self.eat('<') {
            return Ok(leaf(name));
        }

        let parsed = match name {
            "list" => Type::List {
                item: Box::new(self.parse()?),
            },
            "set" => Type::Set {
                item: Box::new(self.parse()?),
            },
            "optional" => Type::Optional {
                item: Box::new(self.parse()?),
            },
            "map" => {
                let key = Box::new(self.parse()?);
                self.skip_whitespace();
                if !self.eat(',') {
                    return Err(self.fail());
                }
                let value = Box::new(self.parse()?);
                Type::Map { key, value }
            }
            _ => return Err(self.fail()),
        };

        self.skip_whitespace();
        if self.eat('>') { Ok(parsed) } else { Err(self.fail()) }
    }

    fn take_name(&mut self) -> Result<&'a str, TypeParseError> {
        let end = self
            .rest
            .char_indices()
            .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '.'))
            .map(|(idx, _)| idx)
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(self.fail());
        }
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(name)
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn fail(&self) -> TypeParseError {
        TypeParseError {
            raw: self.raw.to_string(),
        }
    }
}

fn leaf(name: &str) -> Type {
    match Primitive::from_name(name) {
        Some(primitive) => Type::Primitive { primitive },
        None => Type::Reference {
            name: TypeName::new(name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primitives_and_references() {
        assert_eq!(
            parse_type("string").unwrap(),
            Type::Primitive {
                primitive: Primitive::String
            }
        );
        assert_eq!(
            parse_type("UserId").unwrap(),
            Type::Reference {
                name: TypeName::new("UserId")
            }
        );
    }

    #[test]
    fn test_parse_nested_containers() {
        let parsed = parse_type("map<string, list<UserId>>").unwrap();
        assert_eq!(
            parsed,
            Type::Map {
                key: Box::new(Type::Primitive {
                    primitive: Primitive::String
                }),
                value: Box::new(Type::List {
                    item: Box::new(Type::Reference {
                        name: TypeName::new("UserId")
                    })
                }),
            }
        );
    }

    #[test]
    fn test_parse_tolerates_interior_whitespace() {
        assert!(parse_type("map< string , integer >").is_ok());
        assert!(parse_type("  optional<string>  ").is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed_expressions() {
        for raw in ["", "map<string>", "list<", "list<string>>", "<string>", "map<,string>"] {
            let err = parse_type(raw).unwrap_err();
            assert_eq!(err.raw, raw);
        }
    }

    #[test]
    fn test_type_name_display_contract() {
        assert_eq!(
            TypeName::new("UnknownType").to_string(),
            "TypeName{name=UnknownType}"
        );
    }
}
