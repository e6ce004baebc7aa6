//! Schema tools: `describe_schema` and `list_tables`.
//!
//! Both run fixed catalog queries through [`SchemaInspector`] and share the
//! pipe-table rendering of [`crate::tools::format`].

use crate::db::{ConnectionManager, SchemaInspector};
use crate::error::DbResult;
use crate::models::{ColumnDefinition, IndexColumn, TableInfo};
use crate::tools::format::{format_size_kb, render_table, with_summary};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub const NO_TABLES_MESSAGE: &str = "No tables found";
pub const NO_INDEXES_MESSAGE: &str = "No indexes found";

const TABLE_COLUMN_HEADERS: [&str; 6] = ["Field", "Type", "Null", "Key", "Default", "Extra"];
const INDEX_HEADERS: [&str; 3] = ["Index", "Column", "Unique"];
const TABLE_LIST_HEADERS: [&str; 5] = ["Name", "Type", "Engine", "Rows", "Size"];

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DescribeSchemaInput {
    /// Table to describe. Omit to list the columns of every table.
    #[serde(default)]
    pub table_name: Option<String>,
    /// Also list the table's indexes. Ignored without table_name. Default: false
    #[serde(default)]
    pub include_indexes: bool,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTablesInput {}

fn yes_no(flag: bool) -> String {
    let text = if flag { "YES" } else { "NO" };
    text.to_string()
}

fn or_null(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "NULL".to_string(), |v| v.to_string())
}

fn column_cells(col: &ColumnDefinition) -> Vec<String> {
    vec![
        col.name.clone(),
        col.column_type.clone(),
        yes_no(col.nullable),
        col.key.clone(),
        or_null(col.default.as_deref()),
        col.extra.clone(),
    ]
}

fn render_columns(columns: &[ColumnDefinition]) -> String {
    let rows: Vec<Vec<String>> = columns.iter().map(column_cells).collect();
    with_summary(
        render_table(&TABLE_COLUMN_HEADERS, &rows),
        columns.len(),
        "column",
    )
}

fn render_all_columns(columns: &[ColumnDefinition]) -> String {
    let mut headers = vec!["Table"];
    headers.extend(TABLE_COLUMN_HEADERS);

    let rows: Vec<Vec<String>> = columns
        .iter()
        .map(|col| {
            let mut cells = vec![col.table.clone().unwrap_or_default()];
            cells.extend(column_cells(col));
            cells
        })
        .collect();

    with_summary(render_table(&headers, &rows), columns.len(), "column")
}

fn render_indexes(indexes: &[IndexColumn]) -> String {
    if indexes.is_empty() {
        return NO_INDEXES_MESSAGE.to_string();
    }
    let rows: Vec<Vec<String>> = indexes
        .iter()
        .map(|idx| {
            vec![
                idx.index_name.clone(),
                idx.column_name.clone(),
                yes_no(idx.unique),
            ]
        })
        .collect();
    with_summary(
        render_table(&INDEX_HEADERS, &rows),
        indexes.len(),
        "index column",
    )
}

fn render_tables(tables: &[TableInfo]) -> String {
    let rows: Vec<Vec<String>> = tables
        .iter()
        .map(|t| {
            vec![
                t.name.clone(),
                t.table_type.clone(),
                or_null(t.engine.as_deref()),
                or_null(t.row_count),
                format_size_kb(t.data_size),
            ]
        })
        .collect();
    with_summary(
        render_table(&TABLE_LIST_HEADERS, &rows),
        tables.len(),
        "table",
    )
}

pub struct SchemaToolHandler {
    connection_manager: Arc<ConnectionManager>,
}

impl SchemaToolHandler {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self { connection_manager }
    }

    /// Handle the describe_schema tool call.
    pub async fn describe_schema(&self, input: DescribeSchemaInput) -> DbResult<String> {
        self.describe(&input)
            .await
            .map_err(|e| e.in_operation("describe schema"))
    }

    async fn describe(&self, input: &DescribeSchemaInput) -> DbResult<String> {
        let pool = self.connection_manager.pool().await?;
        let timeout = self.connection_manager.executor().query_timeout();

        let Some(table) = input.table_name.as_deref() else {
            let columns = SchemaInspector::list_columns(pool, None, timeout).await?;
            info!(columns = columns.len(), "Described schema");
            if columns.is_empty() {
                return Ok(NO_TABLES_MESSAGE.to_string());
            }
            return Ok(render_all_columns(&columns));
        };

        let columns = SchemaInspector::list_columns(pool, Some(table), timeout).await?;
        if columns.is_empty() {
            return Ok(format!("Table '{}' not found", table));
        }

        let mut output = render_columns(&columns);

        if input.include_indexes {
            let indexes = SchemaInspector::list_indexes(pool, table, timeout).await?;
            output.push_str("\n\nIndexes:\n");
            output.push_str(&render_indexes(&indexes));
        }

        info!(
            table = %table,
            columns = columns.len(),
            include_indexes = input.include_indexes,
            "Described table"
        );

        Ok(output)
    }

    /// Handle the list_tables tool call.
    pub async fn list_tables(&self, _input: ListTablesInput) -> DbResult<String> {
        self.list()
            .await
            .map_err(|e| e.in_operation("list tables"))
    }

    async fn list(&self) -> DbResult<String> {
        let pool = self.connection_manager.pool().await?;
        let timeout = self.connection_manager.executor().query_timeout();

        let tables = SchemaInspector::list_tables(pool, timeout).await?;
        info!(count = tables.len(), "Listed tables");

        if tables.is_empty() {
            return Ok(NO_TABLES_MESSAGE.to_string());
        }
        Ok(render_tables(&tables))
    }
}
