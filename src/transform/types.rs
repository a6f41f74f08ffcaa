//! Transform types
//!
//! Per-file outcomes and the summary of a batch run.

use serde::Serialize;

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// CSV written
    Processed {
        /// Data rows written
        rows: usize,
        /// Full path of the CSV object
        output: String,
    },
    /// No records could be read from the file
    SkippedEmpty,
    /// The records have no `history` field
    SkippedMissingField,
    /// Any other failure; the run moved on to the next file
    Failed {
        /// Error message
        error: String,
    },
}

impl FileOutcome {
    /// Check if the file produced output
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    /// Check if the file was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedEmpty | Self::SkippedMissingField)
    }

    /// Check if the file failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Rows written, zero unless processed
    pub fn rows(&self) -> usize {
        match self {
            Self::Processed { rows, .. } => *rows,
            _ => 0,
        }
    }

    /// Short label for logs and pretty output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Processed { .. } => "processed",
            Self::SkippedEmpty => "skipped (empty)",
            Self::SkippedMissingField => "skipped (no history)",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome for a named file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Input file name as configured
    pub file: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Aggregate result of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Per-file results, in processing order
    pub files: Vec<FileReport>,
    /// Files that produced a CSV
    pub processed: usize,
    /// Files skipped as empty or without history
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
    /// Total rows written
    pub rows_written: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one file
    pub fn record(&mut self, file: impl Into<String>, outcome: FileOutcome) {
        if outcome.is_processed() {
            self.processed += 1;
        } else if outcome.is_skipped() {
            self.skipped += 1;
        } else {
            self.failed += 1;
        }
        self.rows_written += outcome.rows();
        self.files.push(FileReport {
            file: file.into(),
            outcome,
        });
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Number of files seen
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// True when no file failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Outcome for a file, if it was processed in this run
    pub fn outcome(&self, file: &str) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|r| r.file == file)
            .map(|r| &r.outcome)
    }
}
