//! Query execution tool.
//!
//! This module implements the `run_query` MCP tool. Statements pass the
//! read-only gate, get a bounded `LIMIT` when they are plain SELECTs, and run
//! on the shared pool.

use crate::db::ConnectionManager;
use crate::error::DbResult;
use crate::models::effective_row_limit;
use crate::tools::format::format_result_set;
use crate::tools::row_limit::apply_row_limit;
use crate::tools::sql_validator;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Reply for a statement that produced no rows.
pub const NO_ROWS_MESSAGE: &str = "Query executed successfully. No rows returned.";

/// Input for the run_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL statement to run. Only SELECT, SHOW, DESCRIBE, DESC, EXPLAIN and WITH are accepted.
    pub query: String,
    /// Maximum rows for a SELECT without its own LIMIT. Default: 100, clamped to 1..=1000
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Handler for query execution.
pub struct QueryToolHandler {
    connection_manager: Arc<ConnectionManager>,
}

impl QueryToolHandler {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self { connection_manager }
    }

    /// Handle the run_query tool call.
    ///
    /// Rejected statements never reach the database.
    pub async fn run_query(&self, input: QueryInput) -> DbResult<String> {
        sql_validator::validate_readonly(&input.query)?;

        let limit = effective_row_limit(input.limit);
        let sql = apply_row_limit(&input.query, limit);
        debug!(limit, sql = %sql, "Rewrote query");

        let result = self
            .connection_manager
            .execute(&sql)
            .await
            .map_err(|e| e.in_operation("execute query"))?;

        info!(
            row_count = result.row_count(),
            execution_time_ms = result.execution_time_ms,
            "Query executed"
        );

        Ok(format_result_set(&result, NO_ROWS_MESSAGE))
    }
}
