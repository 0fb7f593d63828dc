//! Records -> Arrow `RecordBatch`
//!
//! Columns are the union of keys across the rows, in first-seen order. A key
//! missing from a row is null for that row. Declared columns are cast per the
//! layout; undeclared (opaque) columns take the narrowest type that holds every
//! non-null value, falling back to text.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use contracts::{ColumnLayout, ColumnType, Record, TargetError, Value};
use tracing::trace;

/// Build a typed batch from buffered records.
///
/// # Errors
/// - `SchemaCoercion` when a value does not fit its declared column
/// - `Encode` when Arrow rejects the assembled batch
pub fn build_batch(
    stream: &str,
    rows: &[Record],
    layout: &ColumnLayout,
) -> Result<RecordBatch, TargetError> {
    let columns = gather_columns(rows);
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

    for column in &columns {
        let declared = layout
            .get(column.name)
            .copied()
            .unwrap_or(ColumnType::Opaque);
        let target = match declared {
            ColumnType::Opaque => infer_type(&column.cells),
            other => other,
        };
        trace!(stream, field = column.name, %declared, %target, "building column");

        let coercer = Coercer {
            stream,
            field: column.name,
        };
        let array = coercer.build(target, &column.cells)?;
        fields.push(Field::new(column.name, array.data_type().clone(), true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
    RecordBatch::try_new_with_options(schema, arrays, &options)
        .map_err(|e| TargetError::encode(stream, e.to_string()))
}

/// One column's cells, `None` for null or missing
struct Column<'a> {
    name: &'a str,
    cells: Vec<Option<&'a Value>>,
}

fn gather_columns(rows: &[Record]) -> Vec<Column<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut columns: Vec<Column<'_>> = Vec::new();

    for (row, record) in rows.iter().enumerate() {
        for (name, value) in record.iter() {
            let slot = match index.get(name) {
                Some(&slot) => slot,
                None => {
                    index.insert(name, columns.len());
                    columns.push(Column {
                        name,
                        cells: Vec::with_capacity(rows.len()),
                    });
                    columns.len() - 1
                }
            };
            let cells = &mut columns[slot].cells;
            cells.resize(row, None);
            cells.push((!value.is_null()).then_some(value));
        }
    }

    for column in &mut columns {
        column.cells.resize(rows.len(), None);
    }
    columns
}

/// Narrowest column type holding every non-null cell
fn infer_type(cells: &[Option<&Value>]) -> ColumnType {
    let (mut total, mut booleans, mut integers, mut floats) = (0, 0, 0, 0);
    for value in cells.iter().flatten() {
        total += 1;
        match value {
            Value::Boolean(_) => booleans += 1,
            Value::Integer(_) => integers += 1,
            Value::Float(_) => floats += 1,
            _ => {}
        }
    }

    if total == 0 {
        ColumnType::Utf8
    } else if booleans == total {
        ColumnType::Boolean
    } else if integers == total {
        ColumnType::Int64
    } else if integers + floats == total {
        ColumnType::Float64
    } else {
        ColumnType::Utf8
    }
}

struct Coercer<'a> {
    stream: &'a str,
    field: &'a str,
}

impl Coercer<'_> {
    fn build(&self, target: ColumnType, cells: &[Option<&Value>]) -> Result<ArrayRef, TargetError> {
        match target {
            ColumnType::Int64 => self.int64(cells),
            ColumnType::Float64 => self.float64(cells),
            ColumnType::Boolean => self.boolean(cells),
            ColumnType::Utf8 | ColumnType::Opaque => Ok(Self::utf8(cells)),
        }
    }

    fn error(&self, row: usize, value: &Value) -> TargetError {
        TargetError::coercion(self.stream, self.field, row, value.to_string())
    }

    fn int64(&self, cells: &[Option<&Value>]) -> Result<ArrayRef, TargetError> {
        let mut builder = Int64Builder::with_capacity(cells.len());
        for (row, cell) in cells.iter().enumerate() {
            match cell {
                None => builder.append_null(),
                Some(value) => {
                    let v = as_i64(value).ok_or_else(|| self.error(row, value))?;
                    builder.append_value(v);
                }
            }
        }
        Ok(Arc::new(builder.finish()))
    }

    fn float64(&self, cells: &[Option<&Value>]) -> Result<ArrayRef, TargetError> {
        let mut builder = Float64Builder::with_capacity(cells.len());
        for (row, cell) in cells.iter().enumerate() {
            match cell {
                None => builder.append_null(),
                Some(value) => {
                    let v = as_f64(value).ok_or_else(|| self.error(row, value))?;
                    builder.append_value(v);
                }
            }
        }
        Ok(Arc::new(builder.finish()))
    }

    fn boolean(&self, cells: &[Option<&Value>]) -> Result<ArrayRef, TargetError> {
        let mut builder = BooleanBuilder::with_capacity(cells.len());
        for (row, cell) in cells.iter().enumerate() {
            match cell {
                None => builder.append_null(),
                Some(value) => {
                    let v = as_bool(value).ok_or_else(|| self.error(row, value))?;
                    builder.append_value(v);
                }
            }
        }
        Ok(Arc::new(builder.finish()))
    }

    fn utf8(cells: &[Option<&Value>]) -> ArrayRef {
        let mut builder = StringBuilder::with_capacity(cells.len(), cells.len() * 16);
        for cell in cells {
            match cell {
                None => builder.append_null(),
                Some(value) => builder.append_value(value.to_text()),
            }
        }
        Arc::new(builder.finish())
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        Value::Float(f) if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
            Some(*f as i64)
        }
        Value::Boolean(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(0) => Some(false),
        Value::Integer(1) => Some(true),
        _ => None,
    }
}
