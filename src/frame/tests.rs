//! Tests for frame module

use super::*;
use crate::transform::DatePattern;
use crate::Error;
use arrow::array::Array;
use arrow::datatypes::DataType;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::tempdir;

fn history_records() -> Vec<Value> {
    vec![
        json!({
            "caseId": 1,
            "history": [
                {"departmentName": "HR", "createdOn": "2022-01-10 09:00:00"},
                {"departmentName": "IT", "location": "Remote"}
            ]
        }),
        json!({"caseId": 2, "history": [{"departmentName": "Ops"}]}),
        json!({"caseId": 3, "history": null}),
        json!({"caseId": 4}),
    ]
}

fn column_values(set: &RecordSet, column: &str) -> Vec<Value> {
    set.to_json()
        .unwrap()
        .into_iter()
        .map(|row| row[column].clone())
        .collect()
}

fn patterns() -> (DatePattern, DatePattern) {
    (
        DatePattern::new("yyyy-MM-dd HH:mm:ss").unwrap(),
        DatePattern::new("dd/MM/yyyy HH:mm:ss").unwrap(),
    )
}

// ============================================================================
// Schema Inference Tests
// ============================================================================

#[test]
fn test_infer_schema_empty() {
    let schema = infer_schema(&[]).unwrap();
    assert!(schema.fields().is_empty());
}

#[test]
fn test_infer_schema_keeps_first_seen_order() {
    let records = vec![json!({"b": 1}), json!({"a": "x"})];
    let schema = infer_schema(&records).unwrap();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_infer_schema_sorts_keys_within_object() {
    let records = vec![json!({"status": "closed", "caseId": "A", "history": []})];
    let schema = infer_schema(&records).unwrap();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["caseId", "history", "status"]);
}

#[test]
fn test_infer_schema_unions_history_item_fields() {
    let schema = infer_schema(&history_records()).unwrap();
    let history = schema.field_with_name("history").unwrap();

    let DataType::List(item) = history.data_type() else {
        panic!("Expected List type");
    };
    let DataType::Struct(fields) = item.data_type() else {
        panic!("Expected Struct element");
    };
    let names: Vec<&str> = fields.iter().map(|f| f.name().as_str()).collect();
    assert!(names.contains(&"departmentName"));
    assert!(names.contains(&"createdOn"));
    assert!(names.contains(&"location"));
}

#[test]
fn test_infer_schema_conflict_falls_back_to_text() {
    let records = vec![json!({"value": 1}), json!({"value": "x"})];
    let schema = infer_schema(&records).unwrap();
    assert_eq!(
        schema.field_with_name("value").unwrap().data_type(),
        &DataType::Utf8
    );

    let set = RecordSet::from_json(&records).unwrap();
    assert_eq!(column_values(&set, "value"), vec![json!("1"), json!("x")]);
}

#[test]
fn test_infer_schema_mixed_numbers() {
    let records = vec![json!({"value": 42}), json!({"value": 3.5})];
    let schema = infer_schema(&records).unwrap();
    assert_eq!(
        schema.field_with_name("value").unwrap().data_type(),
        &DataType::Float64
    );
}

// ============================================================================
// JSON to Arrow Tests
// ============================================================================

#[test]
fn test_json_to_arrow_null_string_stays_null() {
    let records = vec![json!({"name": null}), json!({"name": "Bob"}), json!({})];
    let set = RecordSet::from_json(&records).unwrap();
    assert_eq!(set.num_rows(), 3);
    assert_eq!(
        column_values(&set, "name"),
        vec![Value::Null, json!("Bob"), Value::Null]
    );
}

#[test]
fn test_json_to_arrow_large_unsigned_keeps_digits() {
    let records = vec![json!({"credential": 18_446_744_073_709_551_615_u64, "seq": 7})];
    let schema = infer_schema(&records).unwrap();
    assert_eq!(
        schema.field_with_name("credential").unwrap().data_type(),
        &DataType::Utf8
    );
    assert_eq!(schema.field_with_name("seq").unwrap().data_type(), &DataType::Int64);

    let set = RecordSet::from_json(&records).unwrap();
    assert_eq!(
        column_values(&set, "credential"),
        vec![json!("18446744073709551615")]
    );
}

#[test]
fn test_infer_schema_large_unsigned_with_small_ints_is_text() {
    let records = vec![
        json!({"id": 12_345_678_901_234_567_890_u64}),
        json!({"id": 42}),
    ];
    let set = RecordSet::from_json(&records).unwrap();
    assert_eq!(
        column_values(&set, "id"),
        vec![json!("12345678901234567890"), json!("42")]
    );
}

#[test]
fn test_into_batch_returns_wrapped_batch() {
    let set = RecordSet::from_json(&[json!({"a": 1}), json!({"a": 2})]).unwrap();
    let batch = set.clone().into_batch();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(RecordSet::from(batch).column_names(), set.column_names());
}

#[test]
fn test_json_to_arrow_objects_without_keys() {
    let set = RecordSet::from_json(&[json!({}), json!({})]).unwrap();
    assert_eq!(set.num_rows(), 2);
    assert_eq!(set.num_columns(), 0);
    assert!(!set.has_column("history"));
}

#[test]
fn test_json_to_arrow_empty() {
    let set = RecordSet::from_json(&[]).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_json_roundtrip_nested() {
    let records = vec![json!({"user": {"id": 1, "tags": ["a", "b"]}})];
    let batch = json_to_arrow(&records, None).unwrap();
    assert_eq!(arrow_to_json(&batch).unwrap(), records);
}

// ============================================================================
// Explode Tests
// ============================================================================

#[test]
fn test_explode_row_count() {
    let set = RecordSet::from_json(&history_records()).unwrap();
    let exploded = explode_column(set.batch(), "history").unwrap();
    // 2 + 1 items; null and missing history contribute nothing
    assert_eq!(exploded.num_rows(), 3);
}

#[test]
fn test_explode_repeats_other_columns() {
    let set = RecordSet::from_json(&history_records()).unwrap();
    let exploded = RecordSet::new(explode_column(set.batch(), "history").unwrap());

    assert_eq!(
        column_values(&exploded, "caseId"),
        vec![json!(1), json!(1), json!(2)]
    );
    let history = column_values(&exploded, "history");
    assert_eq!(history[0]["departmentName"], "HR");
    assert_eq!(history[1]["location"], "Remote");
    assert_eq!(history[2]["departmentName"], "Ops");
}

#[test]
fn test_explode_empty_lists() {
    let records = vec![json!({"history": []}), json!({"history": []})];
    let set = RecordSet::from_json(&records).unwrap();
    let exploded = explode_column(set.batch(), "history").unwrap();
    assert_eq!(exploded.num_rows(), 0);
}

#[test]
fn test_explode_non_list_column() {
    let set = RecordSet::from_json(&[json!({"history": "none"})]).unwrap();
    let result = explode_column(set.batch(), "history");
    assert!(matches!(result, Err(Error::Explode { .. })));
}

#[test]
fn test_explode_missing_column() {
    let set = RecordSet::from_json(&[json!({"caseId": 1})]).unwrap();
    let result = explode_column(set.batch(), "history");
    assert!(matches!(result, Err(Error::ColumnNotFound { column }) if column == "history"));
}

// ============================================================================
// Projection Tests
// ============================================================================

#[test]
fn test_project_keep_selects_only_listed_columns() {
    let set = RecordSet::from_json(&history_records()).unwrap();
    let projected = project_columns(set.batch(), &[ColumnExpr::keep("history")]).unwrap();
    let projected = RecordSet::new(projected);
    assert_eq!(projected.column_names(), vec!["history"]);
    assert_eq!(projected.num_rows(), 4);
}

#[test]
fn test_project_missing_paths_are_null() {
    let set = RecordSet::from_json(&[json!({"a": 1})]).unwrap();
    let batch = project_columns(
        set.batch(),
        &[
            ColumnExpr::keep("nope"),
            ColumnExpr::text("a.b", "deep"),
            ColumnExpr::text("missing", "text"),
        ],
    )
    .unwrap();

    assert_eq!(batch.column(0).data_type(), &DataType::Null);
    assert_eq!(batch.column(1).data_type(), &DataType::Utf8);
    assert_eq!(batch.column(1).null_count(), 1);
    assert_eq!(batch.column(2).null_count(), 1);
}

#[test]
fn test_project_text_renders_scalars_and_nested() {
    let records = vec![
        json!({"n": 42, "b": true, "o": {"k": "v"}}),
        json!({"n": null, "b": false, "o": null}),
    ];
    let set = RecordSet::from_json(&records).unwrap();
    let projected = RecordSet::new(
        project_columns(
            set.batch(),
            &[
                ColumnExpr::text("n", "n"),
                ColumnExpr::text("b", "b"),
                ColumnExpr::text("o", "o"),
            ],
        )
        .unwrap(),
    );

    let rows = projected.to_json().unwrap();
    assert_eq!(rows[0], json!({"n": "42", "b": "true", "o": "{\"k\":\"v\"}"}));
    assert_eq!(rows[1], json!({"n": null, "b": "false", "o": null}));
}

#[test]
fn test_project_dates() {
    let (input, output) = patterns();
    let records = vec![
        json!({"createdOn": "2023-05-01 14:30:00"}),
        json!({"createdOn": "05/01/2023"}),
        json!({"createdOn": null}),
        json!({}),
    ];
    let set = RecordSet::from_json(&records).unwrap();
    let projected = RecordSet::new(
        project_columns(
            set.batch(),
            &[ColumnExpr::date("createdOn", "created_on", input, output)],
        )
        .unwrap(),
    );

    assert_eq!(
        column_values(&projected, "created_on"),
        vec![json!("01/05/2023 14:30:00"), Value::Null, Value::Null, Value::Null]
    );
}

#[test]
fn test_resolve_path_through_null_struct() {
    let records = vec![json!({"history": [null, {"x": "a"}]})];
    let set = RecordSet::from_json(&records).unwrap();
    let exploded = explode_column(set.batch(), "history").unwrap();
    assert_eq!(exploded.num_rows(), 2);

    let x = resolve_path(&exploded, "history.x").unwrap().unwrap();
    assert!(x.is_null(0));
    assert!(!x.is_null(1));

    assert!(resolve_path(&exploded, "history.y").unwrap().is_none());
    assert!(resolve_path(&exploded, "other.x").unwrap().is_none());
}

// ============================================================================
// Diagnostics Tests
// ============================================================================

#[test]
fn test_describe_schema() {
    let set = RecordSet::from_json(&[json!({"history": [{"createdOn": "x"}]})]).unwrap();
    assert_eq!(
        set.describe_schema(),
        "root\n \
         |-- history: array (nullable = true)\n \
         |    |-- element: struct (containsNull = true)\n \
         |    |    |-- createdOn: string (nullable = true)"
    );
}

#[test]
fn test_show_limits_rows() {
    let records: Vec<Value> = (0..10).map(|i| json!({"id": i})).collect();
    let set = RecordSet::from_json(&records).unwrap();
    let table = set.show(3).unwrap();
    assert!(table.contains("id"));
    assert!(table.contains("| 2  |"));
    assert!(!table.contains("| 3  |"));
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

#[test]
fn test_csv_writer_config_default() {
    let config = CsvWriterConfig::default();
    assert_eq!(config.delimiter(), b',');
    assert!(config.has_header());
}

#[test]
fn test_write_csv_custom_null_value() {
    let set = RecordSet::from_json(&[json!({"a": "x", "b": null})]).unwrap();
    let projected = project_columns(
        set.batch(),
        &[ColumnExpr::text("a", "a"), ColumnExpr::text("b", "b")],
    )
    .unwrap();

    let config = CsvWriterConfig::new().with_null_value("NULL");
    let data = write_csv_bytes(&projected, &config).unwrap();
    assert_eq!(
        String::from_utf8(data.to_vec()).unwrap().lines().collect::<Vec<_>>(),
        vec!["a,b", "x,NULL"]
    );
}

#[test]
fn test_write_csv_header_and_nulls() {
    let records = vec![
        json!({"a": "x", "b": null}),
        json!({"a": "Remote, BR", "b": "y"}),
    ];
    let set = RecordSet::from_json(&records).unwrap();
    let projected = project_columns(
        set.batch(),
        &[ColumnExpr::text("a", "a"), ColumnExpr::text("b", "b")],
    )
    .unwrap();

    let data = write_csv_bytes(&projected, &CsvWriterConfig::default()).unwrap();
    let text = String::from_utf8(data.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["a,b", "x,", "\"Remote, BR\",y"]);
}

#[test]
fn test_write_csv_empty_batch_has_header() {
    let set = RecordSet::from_json(&[json!({"history": []})]).unwrap();
    let exploded = explode_column(set.batch(), "history").unwrap();
    let projected = project_columns(&exploded, &[ColumnExpr::text("history.a", "a")]).unwrap();

    let data = write_csv_bytes(&projected, &CsvWriterConfig::default()).unwrap();
    let text = String::from_utf8(data.to_vec()).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_write_csv_custom_delimiter() {
    let set = RecordSet::from_json(&[json!({"a": "1", "b": "2"})]).unwrap();
    let config = CsvWriterConfig::new().with_delimiter(b';').with_header(false);
    let data = write_csv_bytes(set.batch(), &config).unwrap();
    assert_eq!(String::from_utf8(data.to_vec()).unwrap().trim_end(), "1;2");
}

// ============================================================================
// ArrowEngine Tests
// ============================================================================

#[tokio::test]
async fn test_engine_load_explode_project_write() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.json");
    std::fs::write(
        &input,
        serde_json::to_string_pretty(&json!([
            {"caseId": "A", "history": [{"milestoneName": "Intake", "endDate": "2022-01-12 17:00:00"}]},
            {"caseId": "B", "history": [{"milestoneName": "Review"}, {"milestoneName": "Done"}]}
        ]))
        .unwrap(),
    )
    .unwrap();

    let engine = ArrowEngine::new();
    let (input_fmt, output_fmt) = patterns();

    let set = engine.load(input.to_str().unwrap()).await.unwrap();
    assert_eq!(set.num_rows(), 2);

    let set = engine.project(set, &[ColumnExpr::keep("history")]).unwrap();
    let set = engine.explode(set, "history").unwrap();
    let set = engine
        .project(
            set,
            &[
                ColumnExpr::text("history.milestoneName", "milestone_name"),
                ColumnExpr::date("history.endDate", "end_date", input_fmt, output_fmt),
            ],
        )
        .unwrap();

    let out = dir.path().join("out").join("in.csv");
    let rows = engine
        .write_csv(&set, out.to_str().unwrap())
        .await
        .unwrap();
    assert_eq!(rows, 3);

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "milestone_name,end_date",
            "Intake,12/01/2022 17:00:00",
            "Review,",
            "Done,"
        ]
    );
}

#[tokio::test]
async fn test_engine_write_with_csv_config() {
    let dir = tempdir().unwrap();
    let set = RecordSet::from_json(&[json!({"a": "1", "b": "2"})]).unwrap();

    let config = CsvWriterConfig::new().with_delimiter(b'|');
    let engine = ArrowEngine::new().with_csv_config(config);
    let out = dir.path().join("piped.csv");
    let rows = engine.write_csv(&set, out.to_str().unwrap()).await.unwrap();

    assert_eq!(rows, 1);
    assert_eq!(
        std::fs::read_to_string(&out).unwrap().lines().collect::<Vec<_>>(),
        vec!["a|b", "1|2"]
    );
}

#[tokio::test]
async fn test_engine_load_jsonl() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.jsonl");
    std::fs::write(&input, "{\"history\": [{}]}\n{\"history\": []}\n").unwrap();

    let engine = ArrowEngine::new().with_format(crate::decode::DecoderFormat::Jsonl);
    let set = engine.load(input.to_str().unwrap()).await.unwrap();
    assert_eq!(set.num_rows(), 2);
    assert!(set.has_column("history"));
}

#[tokio::test]
async fn test_engine_load_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = ArrowEngine::new()
        .load(missing.to_str().unwrap())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_engine_load_invalid_utf8() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bin.json");
    std::fs::write(&input, [0xff, 0xfe, 0x00]).unwrap();
    let err = ArrowEngine::new()
        .load(input.to_str().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
