//! Data models for the MySQL MCP Server.

pub mod connection;
pub mod query;
pub mod schema;

// Re-export commonly used types
pub use connection::{ConnectionConfig, ConnectionTarget, DatabaseType};
pub use query::{
    ColumnMetadata, DEFAULT_ROW_LIMIT, MAX_ROW_LIMIT, QueryResult, effective_row_limit,
    unique_column_keys,
};
pub use schema::{ColumnDefinition, IndexColumn, TableInfo};
