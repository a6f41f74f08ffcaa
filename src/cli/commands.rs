//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flatten nested `history` arrays of JSON exports into CSV files
#[derive(Parser, Debug)]
#[command(name = "history-flatten")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Job configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output (debug logging with schemas and sample rows)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every configured file
    Run {
        /// Input root (local path or cloud URL)
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
        #[arg(short, long)]
        input: Option<String>,

        /// Output root (local path or cloud URL)
        #[arg(short, long)]
        output: Option<String>,

        /// File to process (repeatable, replaces the configured list)
        #[arg(long = "file")]
        files: Vec<String>,
    },

    /// Process a single file from the input root
    Process {
        /// File name relative to the input root
        file: String,
    },

    /// Show the schema and sample rows of an input file without writing
    Inspect {
        /// File name relative to the input root
        file: String,

        /// Number of sample rows
        #[arg(long, default_value = "5")]
        rows: usize,
    },

    /// Print the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "history-flatten",
            "run",
            "--input",
            "/data/raw",
            "--file",
            "a.json",
            "--file",
            "b.json",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Run {
                input,
                output,
                files,
            } => {
                assert_eq!(input.as_deref(), Some("/data/raw"));
                assert!(output.is_none());
                assert_eq!(files, vec!["a.json", "b.json"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_inspect_defaults() {
        let cli = Cli::try_parse_from([
            "history-flatten",
            "--format",
            "pretty",
            "inspect",
            "resultado2022.json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(matches!(
            cli.command,
            Commands::Inspect { ref file, rows: 5 } if file == "resultado2022.json"
        ));
    }

    #[test]
    fn test_process_requires_file() {
        assert!(Cli::try_parse_from(["history-flatten", "process"]).is_err());
    }
}
