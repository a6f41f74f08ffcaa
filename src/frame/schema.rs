//! Arrow schema inference and JSON <-> Arrow conversion
//!
//! Provides utilities for inferring Arrow schemas from JSON records
//! and converting JSON records to Arrow RecordBatches and back.

use crate::error::{Error, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, NullArray, StringArray,
    StructArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::Value;
use std::sync::Arc;

/// Infer an Arrow schema from a set of JSON records
///
/// Keys of one object come back sorted by name (the `serde_json` map
/// order); keys first seen in a later record are appended after them. Types
/// are merged across every record, so a key that only shows up late (or only
/// inside some array elements) still lands in the schema.
pub fn infer_schema(records: &[Value]) -> Result<Schema> {
    let mut fields: Vec<(String, DataType)> = Vec::new();

    for record in records {
        if let Value::Object(obj) = record {
            merge_fields(
                &mut fields,
                obj.iter().map(|(key, value)| (key.as_str(), infer_type(value))),
            );
        }
    }

    Ok(Schema::new(
        fields
            .into_iter()
            .map(|(name, dtype)| Field::new(name, dtype, true)) // All fields nullable
            .collect::<Vec<_>>(),
    ))
}

/// Convert JSON records to an Arrow RecordBatch
///
/// Uses the provided schema or infers one from the data.
pub fn json_to_arrow(records: &[Value], schema: Option<&Schema>) -> Result<RecordBatch> {
    let inferred;
    let schema = match schema {
        Some(schema) => schema,
        None => {
            inferred = infer_schema(records)?;
            &inferred
        }
    };

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema.clone())));
    }

    let mut columns: Vec<ArrayRef> = Vec::new();

    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| {
                if let Value::Object(obj) = record {
                    obj.get(field.name())
                } else {
                    None
                }
            })
            .collect();

        columns.push(build_array(&values, field.data_type())?);
    }

    // Records without any keys still count as rows
    let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
    RecordBatch::try_new_with_options(Arc::new(schema.clone()), columns, &options).map_err(|e| {
        Error::Output {
            message: format!("Failed to create RecordBatch: {e}"),
        }
    })
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else if n.is_u64() {
                // Above i64::MAX: kept as its exact JSON digits
                DataType::Utf8
            } else {
                DataType::Float64
            }
        }
        Value::String(_) => DataType::Utf8,
        Value::Array(arr) => {
            let element_type = arr
                .iter()
                .map(infer_type)
                .fold(DataType::Null, |acc, t| merge_types(&acc, &t));
            DataType::List(Arc::new(Field::new("item", element_type, true)))
        }
        // An object with no keys carries nothing to type
        Value::Object(obj) if obj.is_empty() => DataType::Null,
        Value::Object(obj) => {
            let mut fields = Vec::new();
            merge_fields(&mut fields, obj.iter().map(|(k, v)| (k.as_str(), infer_type(v))));
            DataType::Struct(to_fields(fields))
        }
    }
}

/// Merge named types into an ordered field list
fn merge_fields<'a>(
    fields: &mut Vec<(String, DataType)>,
    incoming: impl Iterator<Item = (&'a str, DataType)>,
) {
    for (name, dtype) in incoming {
        if let Some((_, existing)) = fields.iter_mut().find(|(n, _)| n == name) {
            let merged = merge_types(existing, &dtype);
            *existing = merged;
        } else {
            fields.push((name.to_string(), dtype));
        }
    }
}

fn to_fields(fields: Vec<(String, DataType)>) -> Fields {
    Fields::from(
        fields
            .into_iter()
            .map(|(name, dtype)| Field::new(name, dtype, true))
            .collect::<Vec<_>>(),
    )
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        // Same types
        (a, b) if a == b => a.clone(),

        // Null can merge with anything
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        // Numbers can merge (prefer Float64 for mixed)
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        (DataType::List(a), DataType::List(b)) => DataType::List(Arc::new(Field::new(
            "item",
            merge_types(a.data_type(), b.data_type()),
            true,
        ))),

        (DataType::Struct(a), DataType::Struct(b)) => {
            let mut fields: Vec<(String, DataType)> = a
                .iter()
                .map(|f| (f.name().clone(), f.data_type().clone()))
                .collect();
            merge_fields(
                &mut fields,
                b.iter().map(|f| (f.name().as_str(), f.data_type().clone())),
            );
            DataType::Struct(to_fields(fields))
        }

        // Different types -> fall back to String (most flexible)
        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        other => Err(Error::Output {
            message: format!("Unsupported column type {other}"),
        }),
    }
}

/// Build a list array from JSON arrays
///
/// Anything that is not an array becomes a null list.
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];
    let mut validity: Vec<bool> = Vec::with_capacity(values.len());

    for value in values {
        if let Some(Value::Array(arr)) = value {
            all_items.extend(arr.iter().map(Some));
            validity.push(true);
        } else {
            validity.push(false);
        }
        // Both array and non-array cases need an offset
        let offset = i32::try_from(all_items.len()).map_err(|_| Error::Output {
            message: "Array too large for i32 offset".to_string(),
        })?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let offset_buffer = OffsetBuffer::new(offsets.into());

    let list_array = ListArray::try_new(
        Arc::clone(field),
        offset_buffer,
        items_array,
        Some(NullBuffer::from(validity)),
    )?;
    Ok(Arc::new(list_array))
}

/// Build a struct array from JSON objects
///
/// Anything that is not an object becomes a null struct.
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::new();

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| {
                v.and_then(|v| {
                    if let Value::Object(obj) = v {
                        obj.get(field.name())
                    } else {
                        None
                    }
                })
            })
            .collect();

        child_arrays.push(build_array(&child_values, field.data_type())?);
    }

    let validity: Vec<bool> = values
        .iter()
        .map(|v| matches!(v, Some(Value::Object(_))))
        .collect();

    let struct_array =
        StructArray::try_new(fields.clone(), child_arrays, Some(NullBuffer::from(validity)))?;
    Ok(Arc::new(struct_array))
}

/// Convert an Arrow RecordBatch to JSON records
///
/// Returns a vector of JSON objects, one per row in the batch.
pub fn arrow_to_json(batch: &RecordBatch) -> Result<Vec<Value>> {
    let schema = batch.schema();
    let num_rows = batch.num_rows();
    let mut records = Vec::with_capacity(num_rows);

    for row_idx in 0..num_rows {
        let mut record = serde_json::Map::new();

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let column = batch.column(col_idx);
            let value = array_value_to_json(column.as_ref(), row_idx)?;
            record.insert(field.name().clone(), value);
        }

        records.push(Value::Object(record));
    }

    Ok(records)
}

/// Convert a single array element to JSON
pub(crate) fn array_value_to_json(array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(Value::Null),

        DataType::Boolean => {
            let arr = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| Error::Output {
                    message: "Failed to downcast to BooleanArray".to_string(),
                })?;
            Ok(Value::Bool(arr.value(row)))
        }

        DataType::Int64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| Error::Output {
                    message: "Failed to downcast to Int64Array".to_string(),
                })?;
            Ok(Value::Number(arr.value(row).into()))
        }

        DataType::Float64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| Error::Output {
                    message: "Failed to downcast to Float64Array".to_string(),
                })?;
            let val = arr.value(row);
            Ok(serde_json::Number::from_f64(val).map_or(Value::Null, Value::Number))
        }

        DataType::Utf8 => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::Output {
                    message: "Failed to downcast to StringArray".to_string(),
                })?;
            Ok(Value::String(arr.value(row).to_string()))
        }

        DataType::List(_) => {
            let arr = array
                .as_any()
                .downcast_ref::<ListArray>()
                .ok_or_else(|| Error::Output {
                    message: "Failed to downcast to ListArray".to_string(),
                })?;
            let values = arr.value(row);
            let mut items = Vec::with_capacity(values.len());
            for i in 0..values.len() {
                items.push(array_value_to_json(values.as_ref(), i)?);
            }
            Ok(Value::Array(items))
        }

        DataType::Struct(_) => {
            let arr = array
                .as_any()
                .downcast_ref::<StructArray>()
                .ok_or_else(|| Error::Output {
                    message: "Failed to downcast to StructArray".to_string(),
                })?;
            let mut obj = serde_json::Map::new();
            for (i, field) in arr.fields().iter().enumerate() {
                let val = array_value_to_json(arr.column(i).as_ref(), row)?;
                obj.insert(field.name().clone(), val);
            }
            Ok(Value::Object(obj))
        }

        // Anything else: use Arrow's display formatting
        _ => {
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            Ok(Value::String(formatter.value(row).to_string()))
        }
    }
}

/// Render a schema as an indented tree
///
/// ```text
/// root
///  |-- history: array (nullable = true)
///  |    |-- element: struct (containsNull = true)
///  |    |    |-- createdOn: string (nullable = true)
/// ```
pub fn describe_schema(schema: &Schema) -> String {
    let mut lines = vec!["root".to_string()];
    for field in schema.fields() {
        describe_field(
            &mut lines,
            0,
            field.name(),
            field.data_type(),
            "nullable",
            field.is_nullable(),
        );
    }
    lines.join("\n")
}

fn describe_field(
    lines: &mut Vec<String>,
    depth: usize,
    name: &str,
    data_type: &DataType,
    nullable_label: &str,
    nullable: bool,
) {
    lines.push(format!(
        "{} |-- {name}: {} ({nullable_label} = {nullable})",
        " |   ".repeat(depth),
        type_name(data_type)
    ));

    match data_type {
        DataType::Struct(fields) => {
            for field in fields {
                describe_field(
                    lines,
                    depth + 1,
                    field.name(),
                    field.data_type(),
                    "nullable",
                    field.is_nullable(),
                );
            }
        }
        DataType::List(item) => describe_field(
            lines,
            depth + 1,
            "element",
            item.data_type(),
            "containsNull",
            item.is_nullable(),
        ),
        _ => {}
    }
}

fn type_name(data_type: &DataType) -> String {
    match data_type {
        DataType::Null => "null".to_string(),
        DataType::Boolean => "boolean".to_string(),
        DataType::Int64 => "long".to_string(),
        DataType::Float64 => "double".to_string(),
        DataType::Utf8 => "string".to_string(),
        DataType::List(_) => "array".to_string(),
        DataType::Struct(_) => "struct".to_string(),
        other => other.to_string().to_lowercase(),
    }
}
