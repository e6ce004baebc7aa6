//! MCP service implementation using rmcp.
//!
//! `DbService` answers `tools/list` from the dispatcher's registry and forwards
//! `tools/call` to [`ToolDispatcher::dispatch`]. Tool failures come back as
//! text content in a successful result.

use crate::db::ConnectionManager;
use crate::mcp::dispatcher::ToolDispatcher;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct DbService {
    dispatcher: Arc<ToolDispatcher>,
}

impl DbService {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self {
            dispatcher: Arc::new(ToolDispatcher::new(connection_manager)),
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }
}

impl ServerHandler for DbService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mysql-mcp-server".to_owned(),
                title: Some("MySQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only access to one MySQL database.\n\
                \n\
                ## Tools\n\
                - `list_tables`: tables and views with engine, row estimate and size\n\
                - `describe_schema`: columns of one table (optionally its indexes), or of all tables\n\
                - `run_query`: SELECT, SHOW, DESCRIBE, DESC, EXPLAIN or WITH statements\n\
                \n\
                ## Notes\n\
                - Write and administrative statements are rejected before they reach the database.\n\
                - SELECTs without a LIMIT are capped (default 100 rows, max 1000).\n\
                - Failures are returned as text starting with `Error: `."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(ToolDispatcher::tools()))
    }

    // Hand-written rather than `#[tool_router]`: the macro router turns unknown
    // tools and bad arguments into protocol errors instead of `Error: ` text.
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!(tool = %request.name, "Tool call");
        let response = self
            .dispatcher
            .dispatch(&request.name, request.arguments)
            .await;
        Ok(response.into_call_tool_result())
    }
}
