//! Frame engine capability interface and its in-process implementation

use super::csv::{write_csv_bytes, CsvWriterConfig};
use super::ops::{explode_column, project_columns, ColumnExpr};
use super::record_set::RecordSet;
use crate::config::JobConfig;
use crate::decode::{decoder_for, DecoderFormat, RecordDecoder};
use crate::error::{Error, Result};
use crate::storage::{split_uri, StorageLocation};
use async_trait::async_trait;
use tracing::debug;

/// The data-frame operations the transformer relies on
///
/// Paths are full storage locations (`s3://bucket/a.json`, `/data/a.json`).
#[async_trait]
pub trait FrameEngine: Send + Sync {
    /// Read and decode a JSON file into a record set
    async fn load(&self, path: &str) -> Result<RecordSet>;

    /// One row per element of list column `field`
    fn explode(&self, set: RecordSet, field: &str) -> Result<RecordSet>;

    /// Evaluate column expressions
    fn project(&self, set: RecordSet, columns: &[ColumnExpr]) -> Result<RecordSet>;

    /// Write the set as a single CSV object, replacing any existing one
    ///
    /// Returns the number of data rows written.
    async fn write_csv(&self, set: &RecordSet, path: &str) -> Result<usize>;
}

/// In-process engine backed by Arrow and `object_store`
pub struct ArrowEngine {
    decoder: Box<dyn RecordDecoder>,
    csv: CsvWriterConfig,
}

impl std::fmt::Debug for ArrowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrowEngine")
            .field("format", &self.decoder.format())
            .field("csv", &self.csv)
            .finish()
    }
}

impl Default for ArrowEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrowEngine {
    /// Create an engine reading whole-document JSON
    pub fn new() -> Self {
        Self {
            decoder: decoder_for(DecoderFormat::Json),
            csv: CsvWriterConfig::default(),
        }
    }

    /// Create an engine matching a job config
    pub fn from_config(config: &JobConfig) -> Self {
        Self::new().with_format(DecoderFormat::from_multiline(config.multiline))
    }

    /// Set the input format
    #[must_use]
    pub fn with_format(mut self, format: DecoderFormat) -> Self {
        self.decoder = decoder_for(format);
        self
    }

    /// Set the CSV writer config
    #[must_use]
    pub fn with_csv_config(mut self, csv: CsvWriterConfig) -> Self {
        self.csv = csv;
        self
    }
}

#[async_trait]
impl FrameEngine for ArrowEngine {
    async fn load(&self, path: &str) -> Result<RecordSet> {
        let (root, name) = split_uri(path)?;
        let location = StorageLocation::parse(root)?;
        let data = location.read(name).await?;

        let body = std::str::from_utf8(&data)
            .map_err(|e| Error::decode(format!("{path} is not valid UTF-8: {e}")))?;
        let records = self.decoder.decode(body)?;
        debug!("Decoded {} records from {path}", records.len());

        RecordSet::from_json(&records)
    }

    fn explode(&self, set: RecordSet, field: &str) -> Result<RecordSet> {
        Ok(RecordSet::new(explode_column(set.batch(), field)?))
    }

    fn project(&self, set: RecordSet, columns: &[ColumnExpr]) -> Result<RecordSet> {
        Ok(RecordSet::new(project_columns(set.batch(), columns)?))
    }

    async fn write_csv(&self, set: &RecordSet, path: &str) -> Result<usize> {
        let (root, name) = split_uri(path)?;
        let location = StorageLocation::parse_writable(root)?;

        let data = write_csv_bytes(set.batch(), &self.csv)?;
        let size = data.len();
        let written = location.write(name, data).await?;
        debug!("Wrote {size} bytes to {written}");

        Ok(set.num_rows())
    }
}
