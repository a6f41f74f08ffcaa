//! Job configuration
//!
//! This module contains the configuration structure passed into the
//! transformer at construction. Every field has a default, so a YAML file
//! only needs to list what it changes.

use crate::error::{Error, Result};
use crate::transform::DatePattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Defaults
// ============================================================================

/// Bucket holding the raw JSON exports
pub const DEFAULT_BUCKET: &str = "etl-json-project-raw-json";

/// Files processed when no list is configured
pub const DEFAULT_FILE_NAMES: [&str; 5] = [
    "resultado2022.json",
    "resultado2023.json",
    "resultado2024.json",
    "resultado2025.json",
    "resultado2025V2.json",
];

/// Timestamp layout of `createdOn` / `endDate` in the input
pub const DEFAULT_DATE_INPUT_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

/// Timestamp layout written to the CSV
pub const DEFAULT_DATE_OUTPUT_FORMAT: &str = "dd/MM/yyyy HH:mm:ss";

fn default_input_root() -> String {
    format!("s3://{DEFAULT_BUCKET}/")
}

fn default_output_root() -> String {
    format!("s3://{DEFAULT_BUCKET}/processed_csv/")
}

fn default_file_names() -> Vec<String> {
    DEFAULT_FILE_NAMES.iter().map(ToString::to_string).collect()
}

fn default_date_input_format() -> String {
    DEFAULT_DATE_INPUT_FORMAT.to_string()
}

fn default_date_output_format() -> String {
    DEFAULT_DATE_OUTPUT_FORMAT.to_string()
}

fn default_multiline() -> bool {
    true
}

fn default_sample_rows() -> usize {
    5
}

// ============================================================================
// Job Config
// ============================================================================

/// Configuration for a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Storage root the input files are read from
    #[serde(default = "default_input_root")]
    pub input_root: String,

    /// Storage root the CSV files are written to
    #[serde(default = "default_output_root")]
    pub output_root: String,

    /// Files to process, in order
    #[serde(default = "default_file_names")]
    pub file_names: Vec<String>,

    /// Pattern `createdOn` / `endDate` are parsed with
    #[serde(default = "default_date_input_format")]
    pub date_input_format: String,

    /// Pattern the parsed dates are rendered with
    #[serde(default = "default_date_output_format")]
    pub date_output_format: String,

    /// Whole file is one JSON document (false = JSON Lines)
    #[serde(default = "default_multiline")]
    pub multiline: bool,

    /// Rows shown in diagnostic logging
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,

    /// Report a failed run when any file fails
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input_root: default_input_root(),
            output_root: default_output_root(),
            file_names: default_file_names(),
            date_input_format: default_date_input_format(),
            date_output_format: default_date_output_format(),
            multiline: default_multiline(),
            sample_rows: default_sample_rows(),
            fail_on_error: false,
        }
    }
}

impl JobConfig {
    /// Create a config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Render the config as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Set the input root
    #[must_use]
    pub fn with_input_root(mut self, root: impl Into<String>) -> Self {
        self.input_root = root.into();
        self
    }

    /// Set the output root
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<String>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Replace the file list
    #[must_use]
    pub fn with_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set both date patterns
    #[must_use]
    pub fn with_date_formats(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        self.date_input_format = input.into();
        self.date_output_format = output.into();
        self
    }

    /// Read JSON Lines instead of whole documents
    #[must_use]
    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    /// Set the number of diagnostic sample rows
    #[must_use]
    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.sample_rows = rows;
        self
    }

    /// Report failure when any file fails
    #[must_use]
    pub fn with_fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = fail;
        self
    }

    /// Compile the input date pattern
    pub fn date_input_pattern(&self) -> Result<DatePattern> {
        DatePattern::new(&self.date_input_format)
    }

    /// Compile the output date pattern
    pub fn date_output_pattern(&self) -> Result<DatePattern> {
        DatePattern::new(&self.date_output_format)
    }

    /// Check the config for values the run cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.input_root.trim().is_empty() {
            return Err(Error::missing_field("input_root"));
        }
        if self.output_root.trim().is_empty() {
            return Err(Error::missing_field("output_root"));
        }
        if self.file_names.is_empty() {
            return Err(Error::missing_field("file_names"));
        }

        let mut seen = HashSet::new();
        for name in &self.file_names {
            if name.trim().is_empty() {
                return Err(Error::invalid_value("file_names", "empty file name"));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::invalid_value(
                    "file_names",
                    format!("duplicate file name '{name}'"),
                ));
            }
        }

        self.date_input_pattern()
            .map_err(|e| Error::invalid_value("date_input_format", e.to_string()))?;
        self.date_output_pattern()
            .map_err(|e| Error::invalid_value("date_output_format", e.to_string()))?;

        Ok(())
    }

    /// Full location of an input file
    pub fn input_path(&self, file_name: &str) -> String {
        join_root(&self.input_root, file_name)
    }

    /// Full location of the CSV produced for an input file
    pub fn output_path(&self, file_name: &str) -> String {
        join_root(&self.output_root, &output_file_name(file_name))
    }
}

/// CSV name for an input file: a trailing `.json` becomes `.csv`
///
/// Only a trailing `.json` is replaced; any other name keeps its full text
/// and gets `.csv` appended (`a.json.bak` becomes `a.json.bak.csv`).
pub fn output_file_name(file_name: &str) -> String {
    let base = file_name.strip_suffix(".json").unwrap_or(file_name);
    format!("{base}.csv")
}

/// Join a storage root and a relative name with exactly one separator
pub fn join_root(root: &str, name: &str) -> String {
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}
