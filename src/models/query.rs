//! Query-related data models.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Default row limit for `run_query` when the caller omits one.
pub const DEFAULT_ROW_LIMIT: u32 = 100;

/// Maximum row limit a caller may request.
pub const MAX_ROW_LIMIT: u32 = 1000;

/// Resolve a caller-supplied limit into the `[1, MAX_ROW_LIMIT]` range.
pub fn effective_row_limit(requested: Option<i64>) -> u32 {
    requested
        .unwrap_or(DEFAULT_ROW_LIMIT as i64)
        .clamp(1, MAX_ROW_LIMIT as i64) as u32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Row-map key. Equals `name` unless the name repeats in the same result set.
    pub key: String,
    /// Driver-reported type (e.g., "BIGINT", "VARCHAR", "TEXT")
    pub type_name: String,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            type_name: type_name.into(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

/// Distinct row-map keys for a result set's column names.
///
/// The first occurrence of a name keeps it; later repeats get `name:2`,
/// `name:3` and so on, skipping any key another column already uses.
pub fn unique_column_keys<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.into_iter().collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut keys = Vec::with_capacity(names.len());

    for (idx, name) in names.iter().enumerate() {
        let mut key = name.to_string();
        // A later column literally named like a generated key still wins its own name
        let reserved = |k: &str| taken.contains(k) || names[idx + 1..].iter().any(|n| *n == k);
        if taken.contains(&key) {
            let mut n = 2;
            loop {
                key = format!("{}:{}", name, n);
                if !reserved(&key) {
                    break;
                }
                n += 1;
            }
        }
        taken.insert(key.clone());
        keys.push(key);
    }
    keys
}

/// Columns and rows of one statement execution.
///
/// A key missing from a row map means the value is absent; `JsonValue::Null`
/// means SQL NULL. The formatter keeps the two apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<ColumnMetadata>,
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn new(
        columns: Vec<ColumnMetadata>,
        rows: Vec<serde_json::Map<String, JsonValue>>,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            columns,
            rows,
            execution_time_ms,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_row_limit_defaults() {
        assert_eq!(effective_row_limit(None), DEFAULT_ROW_LIMIT);
    }

    #[test]
    fn test_effective_row_limit_clamps() {
        assert_eq!(effective_row_limit(Some(5000)), MAX_ROW_LIMIT);
        assert_eq!(effective_row_limit(Some(0)), 1);
        assert_eq!(effective_row_limit(Some(-20)), 1);
        assert_eq!(effective_row_limit(Some(250)), 250);
    }

    #[test]
    fn test_query_result_empty() {
        let result = QueryResult::default();
        assert!(result.is_empty());
        assert_eq!(result.row_count(), 0);
    }

    #[test]
    fn test_unique_column_keys() {
        assert_eq!(unique_column_keys(["id", "name"]), vec!["id", "name"]);
        assert_eq!(unique_column_keys(["a", "a", "a"]), vec!["a", "a:2", "a:3"]);
        assert_eq!(unique_column_keys(["a", "a", "a:2"]), vec!["a", "a:3", "a:2"]);
        assert_eq!(unique_column_keys([]), Vec::<String>::new());
    }

    #[test]
    fn test_column_names_in_order() {
        let result = QueryResult::new(
            vec![ColumnMetadata::new("id", "INT"), ColumnMetadata::new("name", "TEXT")],
            Vec::new(),
            0,
        );
        assert_eq!(result.column_names(), vec!["id", "name"]);
    }
}
