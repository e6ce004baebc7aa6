//! Output formatting utilities for MCP tools.
//!
//! Every tool renders its answer as a pipe-separated table:
//!
//! ```text
//! id | name
//! --- | ---
//! 1 | alice
//!
//! 1 row
//! ```
//!
//! Rendering is deterministic: columns keep their result order and rows keep
//! their fetch order.

use crate::models::QueryResult;
use serde_json::Value as JsonValue;

const COLUMN_SEPARATOR: &str = " | ";

/// Render a single cell.
///
/// `None` is a cell the row did not carry at all and renders as `undefined`;
/// SQL NULL renders as `NULL`. The two never collapse into each other.
pub fn format_value(value: Option<&JsonValue>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(JsonValue::Null) => "NULL".to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Array(arr)) => serde_json::to_string(arr).unwrap_or_default(),
        Some(JsonValue::Object(obj)) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

/// Header line, `---` separator line, then one line per row.
pub fn render_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);

    lines.push(
        headers
            .iter()
            .map(|h| h.as_ref())
            .collect::<Vec<_>>()
            .join(COLUMN_SEPARATOR),
    );
    lines.push(vec!["---"; headers.len()].join(COLUMN_SEPARATOR));

    for row in rows {
        lines.push(row.join(COLUMN_SEPARATOR));
    }

    lines.join("\n")
}

/// `1 row`, `2 rows`, `0 indexes`.
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else if noun.ends_with('x') || noun.ends_with('s') {
        format!("{} {}es", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Table followed by a blank line and a count summary.
pub fn with_summary(table: String, count: usize, noun: &str) -> String {
    format!("{}\n\n{}", table, pluralize(count, noun))
}

/// Render a query result, or `empty_message` when it has no rows.
pub fn format_result_set(result: &QueryResult, empty_message: &str) -> String {
    if result.is_empty() {
        return empty_message.to_string();
    }

    let headers = result.column_names();
    let rows: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| {
            result
                .columns
                .iter()
                .map(|column| format_value(row.get(&column.key)))
                .collect()
        })
        .collect();

    with_summary(render_table(&headers, &rows), result.row_count(), "row")
}

/// Byte count as whole kilobytes, rounded half up, or `N/A`.
pub fn format_size_kb(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) => {
            let kb = b / 1024 + u64::from(b % 1024 >= 512);
            format!("{} KB", kb)
        }
        None => "N/A".to_string(),
    }
}
