//! MySQL MCP Server Library
//!
//! Read-only MySQL access for AI assistants over MCP (Model Context
//! Protocol). Query text is gated by a lexical read-only classifier, capped
//! with a row limit, run on a shared pool and rendered as pipe-separated text.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::DbService;
