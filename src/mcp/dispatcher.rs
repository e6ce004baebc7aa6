//! Tool registry and dispatch.
//!
//! The dispatcher owns the three tool handlers and is the boundary where every
//! per-request error becomes response text. Nothing that goes wrong inside a
//! tool call escapes as a protocol fault.

use crate::db::ConnectionManager;
use crate::error::{DbError, DbResult};
use crate::tools::query::{QueryInput, QueryToolHandler};
use crate::tools::schema::{DescribeSchemaInput, ListTablesInput, SchemaToolHandler};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

pub const RUN_QUERY: &str = "run_query";
pub const DESCRIBE_SCHEMA: &str = "describe_schema";
pub const LIST_TABLES: &str = "list_tables";

/// Outcome of one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResponse {
    Text(String),
    Error(String),
}

impl ToolResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Text the caller sees. Errors carry an `Error: ` prefix.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Error(message) => format!("Error: {}", message),
        }
    }

    /// Wrap as a successful MCP result; errors travel as content.
    pub fn into_call_tool_result(self) -> CallToolResult {
        CallToolResult::success(vec![Content::text(self.text())])
    }
}

impl From<DbResult<String>> for ToolResponse {
    fn from(result: DbResult<String>) -> Self {
        match result {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// JSON schema of a tool input type as an MCP input schema object.
fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(JsonValue::Object(map)) => Arc::new(map),
        _ => {
            let mut map = JsonObject::new();
            map.insert("type".to_string(), JsonValue::from("object"));
            Arc::new(map)
        }
    }
}

/// Decode a tool argument bag into its input struct. A missing bag is `{}`.
fn parse_args<T: DeserializeOwned>(arguments: Option<JsonObject>) -> DbResult<T> {
    let value = JsonValue::Object(arguments.unwrap_or_default());
    serde_json::from_value(value)
        .map_err(|e| DbError::invalid_input(format!("Invalid arguments: {}", e)))
}

pub struct ToolDispatcher {
    query: QueryToolHandler,
    schema: SchemaToolHandler,
}

impl ToolDispatcher {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self {
            query: QueryToolHandler::new(connection_manager.clone()),
            schema: SchemaToolHandler::new(connection_manager),
        }
    }

    /// The registry advertised to clients.
    pub fn tools() -> Vec<Tool> {
        vec![
            Tool::new(
                RUN_QUERY,
                "Run a read-only SQL query (SELECT, SHOW, DESCRIBE, DESC, EXPLAIN, WITH).\n\
                 SELECT statements without a LIMIT get one appended (default 100, max 1000).\n\
                 Results are returned as a pipe-separated table.",
                input_schema::<QueryInput>(),
            ),
            Tool::new(
                DESCRIBE_SCHEMA,
                "Describe table columns.\n\
                 With table_name: that table's columns, plus its indexes when include_indexes is true.\n\
                 Without table_name: every column of every table in the current database.",
                input_schema::<DescribeSchemaInput>(),
            ),
            Tool::new(
                LIST_TABLES,
                "List tables and views in the current database with type, engine, approximate row count and data size.",
                input_schema::<ListTablesInput>(),
            ),
        ]
    }

    /// Run one tool call. Always returns a response, never a fault.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> ToolResponse {
        debug!(tool = %name, "Dispatching tool call");

        let response = ToolResponse::from(self.try_dispatch(name, arguments).await);
        if let ToolResponse::Error(message) = &response {
            warn!(tool = %name, error = %message, "Tool call failed");
        }
        response
    }

    async fn try_dispatch(&self, name: &str, arguments: Option<JsonObject>) -> DbResult<String> {
        match name {
            RUN_QUERY => self.query.run_query(parse_args(arguments)?).await,
            DESCRIBE_SCHEMA => self.schema.describe_schema(parse_args(arguments)?).await,
            LIST_TABLES => self.schema.list_tables(parse_args(arguments)?).await,
            other => Err(DbError::unknown_tool(other)),
        }
    }
}
