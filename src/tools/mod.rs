//! MCP tool implementations.
//!
//! - `sql_validator`: read-only gate for query text
//! - `row_limit`: LIMIT injection for plain SELECTs
//! - `format`: pipe-table rendering shared by every tool
//! - `query`: the `run_query` tool
//! - `schema`: the `describe_schema` and `list_tables` tools

pub mod format;
pub mod query;
pub mod row_limit;
pub mod schema;
pub mod sql_validator;

pub use query::{QueryInput, QueryToolHandler};
pub use schema::{DescribeSchemaInput, ListTablesInput, SchemaToolHandler};
