//! Storage module
//!
//! Reads input objects from and writes output objects to storage roots
//! addressed by path-like identifiers.
//!
//! # Overview
//!
//! Supported roots:
//! - `s3://bucket/prefix/` (AWS S3)
//! - `r2://bucket/prefix/` (Cloudflare R2)
//! - `gs://bucket/prefix/` (Google Cloud Storage)
//! - `az://container/prefix/` (Azure Blob Storage)
//! - `/local/path/`, `./path/` or `file:///path/` (local filesystem)

mod location;

pub use location::{split_uri, StorageLocation};
