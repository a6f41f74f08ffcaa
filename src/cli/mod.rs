//! CLI module
//!
//! Command-line interface for running the flattener.
//!
//! # Commands
//!
//! - `run` - Process every configured file
//! - `process` - Process a single file
//! - `inspect` - Show the schema and sample rows of an input file
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
