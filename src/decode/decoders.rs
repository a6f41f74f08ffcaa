//! Decoder implementations
//!
//! Each decoder handles a specific input layout.

use super::types::{DecoderFormat, RecordDecoder};
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::warn;

/// Build the decoder for a format
pub fn decoder_for(format: DecoderFormat) -> Box<dyn RecordDecoder> {
    match format {
        DecoderFormat::Json => Box::new(JsonDecoder::new()),
        DecoderFormat::Jsonl => Box::new(JsonlDecoder::new()),
    }
}

/// Strip a UTF-8 byte order mark
fn strip_bom(body: &str) -> &str {
    body.strip_prefix('\u{feff}').unwrap_or(body)
}

/// Keep object records, flattening one level of top-level arrays
fn collect_objects(value: Value, records: &mut Vec<Value>, dropped: &mut usize) {
    match value {
        Value::Object(_) => records.push(value),
        Value::Array(items) => {
            for item in items {
                if item.is_object() {
                    records.push(item);
                } else {
                    *dropped += 1;
                }
            }
        }
        _ => *dropped += 1,
    }
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// Whole-document JSON decoder
///
/// The file is a single JSON value, which may span many lines.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let body = strip_bom(body);
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;

        let mut records = Vec::new();
        let mut dropped = 0;
        collect_objects(value, &mut records, &mut dropped);

        if dropped > 0 {
            warn!("Dropped {dropped} top-level values that are not JSON objects");
        }
        Ok(records)
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Json
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON value per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut dropped = 0;

        for (line_num, line) in strip_bom(body).lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| Error::Decode {
                message: format!("Failed to parse JSONL at line {}: {e}", line_num + 1),
            })?;

            collect_objects(value, &mut records, &mut dropped);
        }

        if dropped > 0 {
            warn!("Dropped {dropped} top-level values that are not JSON objects");
        }
        Ok(records)
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Jsonl
    }
}
