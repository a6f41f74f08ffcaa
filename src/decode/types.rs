//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Layout of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// One JSON document, possibly pretty-printed over many lines (default)
    #[default]
    Json,
    /// JSON Lines format (one JSON value per line)
    Jsonl,
}

impl DecoderFormat {
    /// Pick the format from the `multiline` job option
    pub fn from_multiline(multiline: bool) -> Self {
        if multiline {
            Self::Json
        } else {
            Self::Jsonl
        }
    }
}

/// Trait for decoding input files into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the file body into a list of top-level records
    ///
    /// Only JSON objects are returned; other top-level values are dropped.
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Format handled by this decoder
    fn format(&self) -> DecoderFormat;
}
