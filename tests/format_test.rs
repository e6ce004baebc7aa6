//! Integration tests for result rendering.

use mysql_mcp_server::models::{ColumnMetadata, QueryResult};
use mysql_mcp_server::tools::format::{format_result_set, format_size_kb, pluralize};
use mysql_mcp_server::tools::query::NO_ROWS_MESSAGE;
use serde_json::{Map, Value, json};

fn row(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn result(columns: &[&str], rows: Vec<Map<String, Value>>) -> QueryResult {
    QueryResult::new(
        columns
            .iter()
            .map(|name| ColumnMetadata::new(*name, "VARCHAR"))
            .collect(),
        rows,
        3,
    )
}

#[test]
fn test_zero_rows_uses_fixed_message() {
    let empty = result(&["id", "email"], vec![]);
    assert_eq!(format_result_set(&empty, NO_ROWS_MESSAGE), NO_ROWS_MESSAGE);
    assert_eq!(
        NO_ROWS_MESSAGE,
        "Query executed successfully. No rows returned."
    );
}

#[test]
fn test_single_row_is_singular() {
    let out = format_result_set(
        &result(&["id", "email"], vec![row(json!({"id": 7, "email": "a@x.io"}))]),
        NO_ROWS_MESSAGE,
    );
    assert_eq!(out, "id | email\n--- | ---\n7 | a@x.io\n\n1 row");
}

#[test]
fn test_two_rows_are_plural() {
    let out = format_result_set(
        &result(
            &["n"],
            vec![row(json!({"n": 1})), row(json!({"n": 2}))],
        ),
        NO_ROWS_MESSAGE,
    );
    assert_eq!(out, "n\n---\n1\n2\n\n2 rows");
}

#[test]
fn test_rows_keep_fetch_order() {
    let rows = vec![
        row(json!({"name": "zed"})),
        row(json!({"name": "amy"})),
        row(json!({"name": "max"})),
    ];
    let out = format_result_set(&result(&["name"], rows), NO_ROWS_MESSAGE);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(&lines[2..5], &["zed", "amy", "max"]);
    assert_eq!(lines.last(), Some(&"3 rows"));
}

#[test]
fn test_null_is_not_undefined() {
    let rows = vec![row(json!({"a": null, "b": 1})), row(json!({"b": 2}))];
    let out = format_result_set(&result(&["a", "b"], rows), NO_ROWS_MESSAGE);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[2], "NULL | 1");
    assert_eq!(lines[3], "undefined | 2");
}

#[test]
fn test_scalar_stringification() {
    let rows = vec![row(json!({
        "flag": false,
        "ratio": 0.25,
        "big": 18446744073709551615u64,
        "when": "2024-01-31 12:00:00",
        "tags": ["a", "b"]
    }))];
    let out = format_result_set(
        &result(&["flag", "ratio", "big", "when", "tags"], rows),
        NO_ROWS_MESSAGE,
    );
    assert!(out.contains("false | 0.25 | 18446744073709551615 | 2024-01-31 12:00:00 | [\"a\",\"b\"]"));
}

#[test]
fn test_pipes_in_values_are_not_escaped() {
    let out = format_result_set(
        &result(&["s"], vec![row(json!({"s": "a | b"}))]),
        NO_ROWS_MESSAGE,
    );
    assert_eq!(out, "s\n---\na | b\n\n1 row");
}

#[test]
fn test_summary_helpers() {
    assert_eq!(pluralize(1, "table"), "1 table");
    assert_eq!(pluralize(10, "table"), "10 tables");
    assert_eq!(format_size_kb(Some(2048)), "2 KB");
    assert_eq!(format_size_kb(Some(100)), "0 KB");
    assert_eq!(format_size_kb(None), "N/A");
}
