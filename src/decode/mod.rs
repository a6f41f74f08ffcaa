//! Input decoder module
//!
//! Supports: whole-document JSON, JSON Lines
//!
//! # Overview
//!
//! The decode module turns the raw bytes of an input file into top-level
//! records. A document that is an array yields one record per element; a
//! document that is an object yields a single record.

mod decoders;
mod types;

pub use decoders::{decoder_for, JsonDecoder, JsonlDecoder};
pub use types::{DecoderFormat, RecordDecoder};

#[cfg(test)]
mod tests;
