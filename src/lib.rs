// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # history-flatten
//!
//! Batch flattening of JSON case exports into CSV.
//!
//! Each configured input file holds case records with a nested `history`
//! array. Every history item becomes one CSV row with eight fixed columns;
//! `createdOn` and `endDate` are reformatted from `yyyy-MM-dd HH:mm:ss` to
//! `dd/MM/yyyy HH:mm:ss`. A file that fails is reported and the run moves on.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use history_flatten::{ArrowEngine, BatchTransformer, JobConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = JobConfig::new()
//!         .with_input_root("s3://etl-json-project-raw-json/")
//!         .with_output_root("s3://etl-json-project-raw-json/processed_csv/");
//!
//!     let engine = ArrowEngine::from_config(&config);
//!     let summary = BatchTransformer::new(config, engine)?.run().await;
//!     println!("{} rows written", summary.rows_written);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BatchTransformer                       │
//! │  run() → RunSummary          process_file() → FileOutcome   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │ FrameEngine
//! ┌──────────────┬──────────────┴──────┬────────────────────────┐
//! │    Decode    │        Frame        │        Storage         │
//! ├──────────────┼─────────────────────┼────────────────────────┤
//! │ JSON         │ Explode             │ S3 / R2                │
//! │ JSON Lines   │ Project             │ GCS / Azure            │
//! │              │ CSV                 │ Local                  │
//! └──────────────┴─────────────────────┴────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Job configuration
pub mod config;

/// Input decoders (JSON, JSON Lines)
pub mod decode;

/// Local and cloud storage roots
pub mod storage;

/// Arrow-backed frame operations
pub mod frame;

/// The batch flattening transformer
pub mod transform;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::JobConfig;
pub use error::{Error, Result};
pub use frame::{ArrowEngine, FrameEngine, RecordSet};
pub use transform::{BatchTransformer, FileOutcome, RunSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
