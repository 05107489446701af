//! Data model for schema source files.
//!
//! One YAML document per file: a `package` name, optional `imports`
//! (package → type names), and `types` (name → definition). Declaration
//! order is significant — it drives both the IR output order and the
//! name list rendered for uniqueness violations — so mappings are
//! decoded into order-preserving `Vec<(key, value)>` pairs instead of
//! sorted maps.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A single parsed schema source file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Package every local declaration is qualified under.
    pub package: String,
    /// Imported names, grouped by the package they come from.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub imports: Vec<(String, Vec<String>)>,
    /// Local type declarations in document order.
    #[serde(default, deserialize_with = "ordered_entries")]
    pub types: Vec<(String, TypeDef)>,
}

/// One local type declaration.
///
/// The shape of the mapping picks the variant: `alias`, `fields`,
/// `union`, or `enum`. Member and field types are kept as raw
/// expressions here and parsed during resolution, so a malformed type
/// is reported against the file that declared it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeDef {
    Alias {
        alias: String,
    },
    Object {
        #[serde(deserialize_with = "ordered_entries")]
        fields: Vec<(String, String)>,
    },
    Union {
        #[serde(deserialize_with = "ordered_entries")]
        union: Vec<(String, String)>,
    },
    Enum {
        #[serde(rename = "enum")]
        values: Vec<String>,
    },
}

/// Decodes a mapping into key/value pairs, preserving document order.
fn ordered_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_file_preserves_declaration_order() {
        let raw = "\
package: test.api
types:
  Zeta:
    alias: string
  Alpha:
    fields:
      id: string
";
        let file: SchemaFile = serde_yaml::from_str(raw).unwrap();
        let names: Vec<&str> = file.types.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_imports_decode_grouped_by_package() {
        let raw = "\
package: test.api
imports:
  other.api: [RemoteThing, RemoteOther]
types:
  Local:
    alias: string
";
        let file: SchemaFile = serde_yaml::from_str(raw).unwrap();
        assert_eq!(
            file.imports,
            vec![(
                "other.api".to_string(),
                vec!["RemoteThing".to_string(), "RemoteOther".to_string()]
            )]
        );
    }

    #[test]
    fn test_union_and_enum_variants_decode() {
        let raw = "\
package: test.api
types:
  SimpleUnion:
    union:
      optionA: map<binary, string>
  Color:
    enum: [RED, GREEN]
";
        let file: SchemaFile = serde_yaml::from_str(raw).unwrap();
        assert!(matches!(file.types[0].1, TypeDef::Union { .. }));
        assert!(matches!(file.types[1].1, TypeDef::Enum { .. }));
    }

    #[test]
    fn test_unstructured_document_is_rejected() {
        assert!(serde_yaml::from_str::<SchemaFile>("just some text").is_err());
        assert!(serde_yaml::from_str::<SchemaFile>("package: [not, a, string]").is_err());
    }
}
