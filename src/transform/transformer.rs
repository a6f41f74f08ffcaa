//! Batch flattening transformer

use super::columns::{base_columns, history_columns, HISTORY_FIELD};
use super::dates::DatePattern;
use super::types::{FileOutcome, RunSummary};
use crate::config::JobConfig;
use crate::error::Result;
use crate::frame::{FrameEngine, RecordSet};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Runs each configured file through load, explode, project and write
///
/// Files are processed strictly one after another, in the configured order.
/// A failing file is reported and the run moves on.
pub struct BatchTransformer<E: FrameEngine> {
    config: JobConfig,
    engine: E,
    date_input: DatePattern,
    date_output: DatePattern,
}

impl<E: FrameEngine> BatchTransformer<E> {
    /// Create a transformer, validating the config
    pub fn new(config: JobConfig, engine: E) -> Result<Self> {
        config.validate()?;
        let date_input = config.date_input_pattern()?;
        let date_output = config.date_output_pattern()?;

        Ok(Self {
            config,
            engine,
            date_input,
            date_output,
        })
    }

    /// Get the config
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Get the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Process every configured file
    pub async fn run(&self) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::new();

        info!(
            "Starting run over {} files from {}",
            self.config.file_names.len(),
            self.config.input_root
        );

        for file_name in &self.config.file_names {
            let outcome = self.process_file(file_name).await;
            summary.record(file_name.as_str(), outcome);
        }

        summary.set_duration(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX));

        info!(
            "Run finished: {} processed, {} skipped, {} failed, {} rows in {}ms",
            summary.processed,
            summary.skipped,
            summary.failed,
            summary.rows_written,
            summary.duration_ms
        );
        summary
    }

    /// Process one file, turning every error into `FileOutcome::Failed`
    pub async fn process_file(&self, file_name: &str) -> FileOutcome {
        let input_path = self.config.input_path(file_name);
        info!("Processing {input_path}");

        match self.try_process_file(file_name, &input_path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(file = %file_name, error = ?e, "Failed to process {input_path}: {e}");
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_process_file(&self, file_name: &str, input_path: &str) -> Result<FileOutcome> {
        let raw = self.engine.load(input_path).await?;
        debug!("Read {} records from {file_name}", raw.num_rows());

        if raw.is_empty() {
            warn!("{file_name} was read but is empty or malformed; nothing to process");
            return Ok(FileOutcome::SkippedEmpty);
        }

        self.log_diagnostics(file_name, "raw", &raw);

        if !raw.has_column(HISTORY_FIELD) {
            warn!("{file_name} has no '{HISTORY_FIELD}' column; skipping");
            return Ok(FileOutcome::SkippedMissingField);
        }

        let selected = self.engine.project(raw, &base_columns())?;
        let exploded = self.engine.explode(selected, HISTORY_FIELD)?;
        let processed = self
            .engine
            .project(exploded, &history_columns(&self.date_input, &self.date_output))?;

        self.log_diagnostics(file_name, "processed", &processed);

        let output_path = self.config.output_path(file_name);
        info!("Writing CSV to {output_path}");
        let rows = self.engine.write_csv(&processed, &output_path).await?;
        info!("Finished {file_name}: {rows} rows");

        Ok(FileOutcome::Processed {
            rows,
            output: output_path,
        })
    }

    fn log_diagnostics(&self, file_name: &str, stage: &str, set: &RecordSet) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }

        debug!("Schema of {stage} data for {file_name}:\n{}", set.describe_schema());
        if self.config.sample_rows > 0 {
            match set.show(self.config.sample_rows) {
                Ok(table) => debug!("Sample of {stage} data for {file_name}:\n{table}"),
                Err(e) => debug!("Could not render sample of {file_name}: {e}"),
            }
        }
    }
}
