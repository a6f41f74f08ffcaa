//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::JobConfig;
use crate::error::{Error, Result};
use crate::frame::{ArrowEngine, FrameEngine};
use crate::transform::{BatchTransformer, FileOutcome, FileReport, RunSummary};
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                input,
                output,
                files,
            } => {
                self.run_batch(input.as_deref(), output.as_deref(), files)
                    .await
            }
            Commands::Process { file } => self.process(file).await,
            Commands::Inspect { file, rows } => self.inspect(file, *rows).await,
            Commands::Config => self.show_config(),
        }
    }

    /// Load the job config, falling back to defaults
    fn load_config(&self) -> Result<JobConfig> {
        match &self.cli.config {
            Some(path) => {
                info!("Loading config from {}", path.display());
                JobConfig::from_file(path)
            }
            None => Ok(JobConfig::default()),
        }
    }

    /// Build a transformer for a config
    fn build_transformer(config: JobConfig) -> Result<BatchTransformer<ArrowEngine>> {
        let engine = ArrowEngine::from_config(&config);
        BatchTransformer::new(config, engine)
    }

    /// Process every configured file
    async fn run_batch(
        &self,
        input: Option<&str>,
        output: Option<&str>,
        files: &[String],
    ) -> Result<()> {
        let config = apply_overrides(self.load_config()?, input, output, files);
        let fail_on_error = config.fail_on_error;

        let transformer = Self::build_transformer(config)?;
        let summary = transformer.run().await;

        self.output_summary(&summary);
        check_summary(&summary, fail_on_error)
    }

    /// Process a single file
    async fn process(&self, file: &str) -> Result<()> {
        let config = self.load_config()?.with_file_names([file]);
        let fail_on_error = config.fail_on_error;

        let transformer = Self::build_transformer(config)?;
        let outcome = transformer.process_file(file).await;
        let failed = outcome.is_failed();

        let report = FileReport {
            file: file.to_string(),
            outcome,
        };
        self.output_message(&serde_json::to_value(&report)?);

        if fail_on_error && failed {
            return Err(Error::RunFailed {
                failed: 1,
                total: 1,
            });
        }
        Ok(())
    }

    /// Print the schema tree and sample rows of an input file
    async fn inspect(&self, file: &str, rows: usize) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;

        let engine = ArrowEngine::from_config(&config);
        let path = config.input_path(file);
        let set = engine.load(&path).await?;

        match self.cli.format {
            OutputFormat::Json => {
                let sample = set.to_json()?;
                let sample: Vec<Value> = sample.into_iter().take(rows).collect();
                self.output_message(&json!({
                    "file": file,
                    "path": path,
                    "rows": set.num_rows(),
                    "columns": set.column_names(),
                    "schema": set.describe_schema(),
                    "sample": sample,
                }));
            }
            OutputFormat::Pretty => {
                println!("{path}: {} rows", set.num_rows());
                println!("{}", set.describe_schema());
                if rows > 0 && !set.is_empty() {
                    println!("{}", set.show(rows)?);
                }
            }
        }
        Ok(())
    }

    /// Print the effective configuration as YAML
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        print!("{}", config.to_yaml()?);
        Ok(())
    }

    /// Print a run summary
    fn output_summary(&self, summary: &RunSummary) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(summary).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                for report in &summary.files {
                    println!("{:<28} {}", report.file, describe_outcome(report));
                }
                println!(
                    "{} files: {} processed, {} skipped, {} failed, {} rows in {}ms",
                    summary.total(),
                    summary.processed,
                    summary.skipped,
                    summary.failed,
                    summary.rows_written,
                    summary.duration_ms
                );
            }
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Apply command-line overrides on top of a loaded config
fn apply_overrides(
    mut config: JobConfig,
    input: Option<&str>,
    output: Option<&str>,
    files: &[String],
) -> JobConfig {
    if let Some(input) = input {
        config = config.with_input_root(input);
    }
    if let Some(output) = output {
        config = config.with_output_root(output);
    }
    if !files.is_empty() {
        config = config.with_file_names(files.iter().cloned());
    }
    config
}

/// Turn a summary into the command result
fn check_summary(summary: &RunSummary, fail_on_error: bool) -> Result<()> {
    if fail_on_error && !summary.is_success() {
        return Err(Error::RunFailed {
            failed: summary.failed,
            total: summary.total(),
        });
    }
    Ok(())
}

fn describe_outcome(report: &FileReport) -> String {
    match &report.outcome {
        FileOutcome::Processed { rows, output } => format!("{rows} rows -> {output}"),
        FileOutcome::Failed { error } => format!("failed: {error}"),
        other => other.label().to_string(),
    }
}
