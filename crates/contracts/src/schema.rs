//! Declared stream schemas and concrete column layouts

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field-type schema carried by a `SCHEMA` message
///
/// Only `properties` is interpreted; every other JSON-schema keyword is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertySchema>>,
}

impl StreamSchema {
    /// Schema with the given `(field, type)` pairs
    pub fn with_types<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let properties = fields
            .into_iter()
            .map(|(name, type_name)| {
                (
                    name.to_string(),
                    PropertySchema {
                        type_decl: Some(TypeDecl::Single(type_name.to_string())),
                    },
                )
            })
            .collect();
        Self {
            properties: Some(properties),
        }
    }
}

/// Declaration of a single field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_decl: Option<TypeDecl>,
}

/// `"type"` keyword: a single name or a union such as `["null", "integer"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    Single(String),
    Union(Vec<String>),
}

/// Concrete nullable column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int64,
    Float64,
    Utf8,
    Boolean,
    /// Untyped column; the concrete type is inferred from the values at flush
    Opaque,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Utf8 => "utf8",
            Self::Boolean => "boolean",
            Self::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// Field name -> column type
pub type ColumnLayout = BTreeMap<String, ColumnType>;
