//! Explode and projection kernels
//!
//! Both operate on a single RecordBatch and build new columns with Arrow's
//! `take` / `nullif` kernels rather than going back through JSON.

use super::schema::array_value_to_json;
use crate::error::{Error, Result};
use crate::transform::DatePattern;
use arrow::array::{
    new_null_array, Array, ArrayRef, BooleanArray, ListArray, StringArray, StructArray,
    UInt32Array,
};
use arrow::compute::kernels::nullif::nullif;
use arrow::compute::kernels::take::take;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// Column Expressions
// ============================================================================

/// How a projected column is derived from its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTransform {
    /// Keep the source column as-is
    Keep,
    /// Render values as text
    Text,
    /// Parse text with `input` and render it with `output`; misses become null
    Date {
        /// Pattern the source is parsed with
        input: DatePattern,
        /// Pattern the result is rendered with
        output: DatePattern,
    },
}

/// One output column of a projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnExpr {
    /// Dotted path into the input (`history.createdOn`)
    pub source: String,
    /// Output column name
    pub alias: String,
    /// How values are derived
    pub transform: ColumnTransform,
}

impl ColumnExpr {
    /// Pass a column through under its own name
    pub fn keep(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            alias: source.clone(),
            source,
            transform: ColumnTransform::Keep,
        }
    }

    /// Project a field as text under a new name
    pub fn text(source: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alias: alias.into(),
            transform: ColumnTransform::Text,
        }
    }

    /// Project a field as a reformatted date under a new name
    pub fn date(
        source: impl Into<String>,
        alias: impl Into<String>,
        input: DatePattern,
        output: DatePattern,
    ) -> Self {
        Self {
            source: source.into(),
            alias: alias.into(),
            transform: ColumnTransform::Date { input, output },
        }
    }
}

// ============================================================================
// Explode
// ============================================================================

/// Turn each element of list column `field` into its own row
///
/// The element column keeps the name `field`; every other column is repeated
/// once per element. Null and empty lists contribute no rows.
pub fn explode_column(batch: &RecordBatch, field: &str) -> Result<RecordBatch> {
    let schema = batch.schema();
    let index = schema
        .index_of(field)
        .map_err(|_| Error::column_not_found(field))?;

    let column = batch.column(index);
    let element_field = match column.data_type() {
        DataType::List(item) => Arc::clone(item),
        other => {
            return Err(Error::explode(
                field,
                format!("expected a list column, found {other}"),
            ))
        }
    };
    let list = column
        .as_any()
        .downcast_ref::<ListArray>()
        .ok_or_else(|| Error::explode(field, "failed to downcast to ListArray"))?;

    let offsets = list.value_offsets();
    let mut parent_indices: Vec<u32> = Vec::new();
    let mut value_indices: Vec<u32> = Vec::new();

    for row in 0..list.len() {
        if list.is_null(row) {
            continue;
        }
        let parent = u32::try_from(row)
            .map_err(|_| Error::explode(field, "too many rows for u32 indices"))?;
        for value in offsets[row]..offsets[row + 1] {
            let value = u32::try_from(value)
                .map_err(|_| Error::explode(field, "invalid list offset"))?;
            parent_indices.push(parent);
            value_indices.push(value);
        }
    }

    let row_count = value_indices.len();
    let parent_indices = UInt32Array::from(parent_indices);
    let value_indices = UInt32Array::from(value_indices);

    let mut fields = Vec::with_capacity(schema.fields().len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for (i, f) in schema.fields().iter().enumerate() {
        if i == index {
            let exploded = take(list.values().as_ref(), &value_indices, None)?;
            fields.push(Field::new(
                f.name(),
                element_field.data_type().clone(),
                true,
            ));
            columns.push(exploded);
        } else {
            columns.push(take(batch.column(i).as_ref(), &parent_indices, None)?);
            fields.push(f.as_ref().clone());
        }
    }

    let options = RecordBatchOptions::new().with_row_count(Some(row_count));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &options,
    )?)
}

// ============================================================================
// Projection
// ============================================================================

/// Resolve a dotted path to a column
///
/// Returns `None` when any segment is missing or a non-struct is descended
/// into. Nulls of enclosing structs are carried down to the result.
pub fn resolve_path(batch: &RecordBatch, path: &str) -> Result<Option<ArrayRef>> {
    let mut segments = path.split('.');
    let Some(first) = segments.next() else {
        return Ok(None);
    };
    let Some(mut current) = batch.column_by_name(first).map(Arc::clone) else {
        return Ok(None);
    };

    for segment in segments {
        let Some(parent) = current.as_any().downcast_ref::<StructArray>() else {
            return Ok(None);
        };
        let Some(child) = parent.column_by_name(segment) else {
            return Ok(None);
        };

        let child = if parent.null_count() > 0 && child.data_type() != &DataType::Null {
            let parent_null: BooleanArray =
                (0..parent.len()).map(|i| Some(parent.is_null(i))).collect();
            nullif(child.as_ref(), &parent_null)?
        } else {
            Arc::clone(child)
        };
        current = child;
    }

    Ok(Some(current))
}

/// Render any column as a Utf8 column
///
/// Strings pass through; other scalars use their JSON text and nested values
/// become compact JSON.
pub fn text_column(array: &ArrayRef) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Utf8 => Ok(Arc::clone(array)),
        DataType::Null => Ok(new_null_array(&DataType::Utf8, array.len())),
        _ => {
            let values = (0..array.len())
                .map(|row| {
                    array_value_to_json(array.as_ref(), row).map(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(s),
                        other => Some(other.to_string()),
                    })
                })
                .collect::<Result<Vec<Option<String>>>>()?;
            Ok(Arc::new(StringArray::from(values)))
        }
    }
}

/// Reformat a text column of dates; unparseable values become null
pub fn date_column(array: &ArrayRef, input: &DatePattern, output: &DatePattern) -> Result<ArrayRef> {
    let text = text_column(array)?;
    let strings = text
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| Error::output("Failed to downcast to StringArray"))?;

    let reformatted: StringArray = strings
        .iter()
        .map(|v| v.and_then(|v| input.reformat(v, output)))
        .collect();
    Ok(Arc::new(reformatted))
}

/// Evaluate column expressions against a batch
///
/// Paths that do not resolve yield all-null columns.
pub fn project_columns(batch: &RecordBatch, columns: &[ColumnExpr]) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

    for expr in columns {
        let resolved = resolve_path(batch, &expr.source)?;

        let array = match &expr.transform {
            ColumnTransform::Keep => {
                resolved.unwrap_or_else(|| new_null_array(&DataType::Null, rows))
            }
            ColumnTransform::Text => match resolved {
                Some(array) => text_column(&array)?,
                None => new_null_array(&DataType::Utf8, rows),
            },
            ColumnTransform::Date { input, output } => match resolved {
                Some(array) => date_column(&array, input, output)?,
                None => new_null_array(&DataType::Utf8, rows),
            },
        };

        fields.push(Field::new(&expr.alias, array.data_type().clone(), true));
        arrays.push(array);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}
