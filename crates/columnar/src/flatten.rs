//! Nested record flattening

use contracts::{Record, RecordTransform, Value};

/// Flatten nested objects into single-level keys joined by `separator`.
///
/// Arrays become their JSON text; scalars are kept as-is.
///
/// ```
/// use contracts::Record;
///
/// let nested: Record = serde_json::from_str(r#"{"a": 1, "b": {"c": 2, "d": ["x"]}}"#).unwrap();
/// let flat = columnar::flatten(nested, "__");
/// let keys: Vec<_> = flat.keys().collect();
/// assert_eq!(keys, ["a", "b__c", "b__d"]);
/// ```
pub fn flatten(record: Record, separator: &str) -> Record {
    let mut flat = Record::new();
    flatten_into(&mut flat, None, record, separator);
    flat
}

fn flatten_into(out: &mut Record, parent: Option<&str>, record: Record, separator: &str) {
    for (key, value) in record {
        let key = match parent {
            Some(parent) => format!("{parent}{separator}{key}"),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(out, Some(&key), nested, separator),
            Value::Array(_) => {
                let text = value.to_text();
                out.insert(key, Value::String(text));
            }
            scalar => out.insert(key, scalar),
        }
    }
}

/// `RecordTransform` wrapper around [`flatten`]
#[derive(Debug, Clone)]
pub struct Flatten {
    separator: String,
}

impl Flatten {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for Flatten {
    fn default() -> Self {
        Self::new("__")
    }
}

impl RecordTransform for Flatten {
    fn name(&self) -> &str {
        "flatten"
    }

    fn apply(&self, record: Record) -> Record {
        flatten(record, &self.separator)
    }
}
