//! CSV writer
//!
//! Encodes a RecordBatch as one CSV document in memory, ready to be stored
//! as a single object.

use crate::error::{Error, Result};
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;

/// Configuration for the CSV writer
#[derive(Debug, Clone)]
pub struct CsvWriterConfig {
    delimiter: u8,
    header: bool,
    null_value: String,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            header: true,
            null_value: String::new(),
        }
    }
}

impl CsvWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable the header row
    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Text written for null values
    #[must_use]
    pub fn with_null_value(mut self, null_value: impl Into<String>) -> Self {
        self.null_value = null_value.into();
        self
    }

    /// Get the field delimiter
    #[must_use]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Get header enabled
    #[must_use]
    pub fn has_header(&self) -> bool {
        self.header
    }

    fn builder(&self) -> WriterBuilder {
        WriterBuilder::new()
            .with_delimiter(self.delimiter)
            .with_header(self.header)
            .with_null(self.null_value.clone())
    }
}

/// Encode a batch as CSV
///
/// The header row is written even when the batch has no rows.
pub fn write_csv_bytes(batch: &RecordBatch, config: &CsvWriterConfig) -> Result<Bytes> {
    let mut writer = config.builder().build(Vec::new());
    writer.write(batch).map_err(|e| Error::Output {
        message: format!("Failed to write CSV: {e}"),
    })?;
    Ok(Bytes::from(writer.into_inner()))
}
