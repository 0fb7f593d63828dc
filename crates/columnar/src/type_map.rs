//! Declared field types -> concrete column types

use contracts::{ColumnLayout, ColumnType, PropertySchema, StreamSchema, TargetError, TypeDecl};

/// Derive the column layout of a stream schema.
///
/// A schema without `properties` yields an empty layout, leaving every column
/// to be inferred at flush time.
///
/// # Errors
/// `UnsupportedType` for a type name with no column mapping.
pub fn map_schema(schema: &StreamSchema) -> Result<ColumnLayout, TargetError> {
    let Some(properties) = &schema.properties else {
        return Ok(ColumnLayout::new());
    };

    properties
        .iter()
        .map(|(field, property)| Ok((field.clone(), map_property(field, property)?)))
        .collect()
}

fn map_property(field: &str, property: &PropertySchema) -> Result<ColumnType, TargetError> {
    match &property.type_decl {
        None => Ok(ColumnType::Opaque),
        Some(TypeDecl::Single(name)) if name.is_empty() => Ok(ColumnType::Opaque),
        Some(TypeDecl::Single(name)) => map_type_name(field, name),
        Some(TypeDecl::Union(names)) => {
            let concrete: Vec<&str> = names
                .iter()
                .map(String::as_str)
                .filter(|name| *name != "null")
                .collect();
            match concrete.as_slice() {
                [] => Ok(ColumnType::Opaque),
                [single] => map_type_name(field, single),
                _ => Err(TargetError::unsupported_type(field, names.join(","))),
            }
        }
    }
}

fn map_type_name(field: &str, name: &str) -> Result<ColumnType, TargetError> {
    match name {
        "integer" => Ok(ColumnType::Int64),
        "number" => Ok(ColumnType::Float64),
        "string" => Ok(ColumnType::Utf8),
        "boolean" => Ok(ColumnType::Boolean),
        "array" | "null" => Ok(ColumnType::Opaque),
        other => Err(TargetError::unsupported_type(field, other)),
    }
}
