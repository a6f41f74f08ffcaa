//! RecordSet: the unit of data passed between frame operations

use super::schema::{arrow_to_json, describe_schema, json_to_arrow};
use crate::error::Result;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde_json::Value;

/// A columnar set of rows backed by a single Arrow RecordBatch
#[derive(Debug, Clone)]
pub struct RecordSet {
    batch: RecordBatch,
}

impl RecordSet {
    /// Wrap an existing batch
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Build a set from JSON object records, inferring the schema
    pub fn from_json(records: &[Value]) -> Result<Self> {
        Ok(Self::new(json_to_arrow(records, None)?))
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of top-level columns
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// True when there are no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Schema of the set
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Top-level column names, in order
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Whether a top-level column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().column_with_name(name).is_some()
    }

    /// Underlying batch
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Take the underlying batch
    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    /// Rows as JSON objects
    pub fn to_json(&self) -> Result<Vec<Value>> {
        arrow_to_json(&self.batch)
    }

    /// Schema as an indented tree
    pub fn describe_schema(&self) -> String {
        describe_schema(&self.batch.schema())
    }

    /// Up to `limit` rows as a table
    pub fn show(&self, limit: usize) -> Result<String> {
        let sample = self.batch.slice(0, limit.min(self.num_rows()));
        Ok(pretty_format_batches(&[sample])?.to_string())
    }
}

impl From<RecordBatch> for RecordSet {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}
