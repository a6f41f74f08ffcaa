//! Transform module
//!
//! Flattens nested `history` arrays into CSV rows, one input file at a time.
//!
//! # Overview
//!
//! The transform module provides:
//! - `BatchTransformer` - Runs the fixed file list through a `FrameEngine`
//! - `FileOutcome` / `RunSummary` - Per-file results and their aggregate
//! - `DatePattern` - Date parsing and rendering used by the projection
//! - `history_columns` - The output columns and their sources

mod columns;
mod dates;
mod transformer;
mod types;

pub use columns::{base_columns, history_columns, HISTORY_FIELD, OUTPUT_COLUMNS};
pub use dates::DatePattern;
pub use transformer::BatchTransformer;
pub use types::{FileOutcome, FileReport, RunSummary};
