//! Frame module
//!
//! A narrow data-frame layer: load JSON into Arrow, explode a list column,
//! project columns, and write CSV.
//!
//! # Overview
//!
//! - `FrameEngine` - The capability interface the transformer is written against
//! - `ArrowEngine` - In-process implementation over Arrow and `object_store`
//! - `RecordSet` - Rows passed between operations
//! - `ColumnExpr` - Column expressions used by `project`

mod csv;
mod engine;
mod ops;
mod record_set;
mod schema;

pub use csv::{write_csv_bytes, CsvWriterConfig};
pub use engine::{ArrowEngine, FrameEngine};
pub use ops::{
    date_column, explode_column, project_columns, resolve_path, text_column, ColumnExpr,
    ColumnTransform,
};
pub use record_set::RecordSet;
pub use schema::{arrow_to_json, describe_schema, infer_schema, json_to_arrow};

#[cfg(test)]
mod tests;
