//! MCP server integration module.
//!
//! `dispatcher` owns the tool registry and turns tool calls into text
//! responses; `service` adapts it to the rmcp `ServerHandler` trait.

pub mod dispatcher;
pub mod service;

pub use dispatcher::{ToolDispatcher, ToolResponse};
pub use service::DbService;
