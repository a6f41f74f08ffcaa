//! Tests for decoder module

use super::*;

// ============================================================================
// DecoderFormat Tests
// ============================================================================

#[test]
fn test_decoder_format_default() {
    assert_eq!(DecoderFormat::default(), DecoderFormat::Json);
}

#[test]
fn test_decoder_format_from_multiline() {
    assert_eq!(DecoderFormat::from_multiline(true), DecoderFormat::Json);
    assert_eq!(DecoderFormat::from_multiline(false), DecoderFormat::Jsonl);
    assert_eq!(decoder_for(DecoderFormat::Jsonl).format(), DecoderFormat::Jsonl);
}

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_array() {
    let decoder = JsonDecoder::new();
    let body = r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_json_decoder_object() {
    let decoder = JsonDecoder::new();
    let body = r#"{"caseId": 7, "history": []}"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["caseId"], 7);
}

#[test]
fn test_json_decoder_pretty_printed() {
    let decoder = JsonDecoder::new();
    let body = r#"
{
    "caseId": 1,
    "history": [
        {
            "departmentName": "HR",
            "createdOn": "2022-01-10 09:00:00"
        }
    ]
}
"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["history"][0]["departmentName"], "HR");
}

#[test]
fn test_json_decoder_empty_body() {
    let decoder = JsonDecoder::new();
    assert!(decoder.decode("").unwrap().is_empty());
    assert!(decoder.decode(" \n\t ").unwrap().is_empty());
    assert!(decoder.decode("[]").unwrap().is_empty());
}

#[test]
fn test_json_decoder_byte_order_mark() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode("\u{feff}{\"id\": 1}").unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_json_decoder_drops_scalars() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode(r#"[1, "two", {"id": 3}, null]"#).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 3);

    assert!(decoder.decode("42").unwrap().is_empty());
}

#[test]
fn test_json_decoder_invalid() {
    let decoder = JsonDecoder::new();
    let result = decoder.decode("{\"history\": [");
    assert!(matches!(result, Err(crate::Error::Decode { .. })));
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_decoder_basic() {
    let decoder = JsonlDecoder::new();
    let body = r#"{"id": 1}
{"id": 2}
{"id": 3}"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[1]["id"], 2);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_jsonl_decoder_empty_lines() {
    let decoder = JsonlDecoder::new();
    let body = r#"{"id": 1}

{"id": 2}
"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_jsonl_decoder_invalid_line() {
    let decoder = JsonlDecoder::new();
    let body = r#"{"id": 1}
not valid json
{"id": 2}"#;

    let err = decoder.decode(body).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_jsonl_decoder_rejects_pretty_document() {
    let decoder = JsonlDecoder::new();
    let body = "{\n  \"id\": 1\n}";
    assert!(decoder.decode(body).is_err());
}
