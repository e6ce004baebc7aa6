//! Error types for the MySQL MCP Server.
//!
//! Errors are raised between the pool, the inspectors and the tool handlers as
//! `DbError` values. The dispatcher turns every per-request error into response
//! text; only [`DbError::Startup`] is allowed to stop the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The read-only gate refused the statement.
    #[error("Query rejected: {reason}")]
    QueryDenied { reason: String },

    /// A dispatched statement failed on a live pool.
    #[error("Failed to {operation}: {message}")]
    Execution { operation: String, message: String },

    /// Pool construction or the liveness probe failed.
    #[error("Startup failed: {message}")]
    Startup { message: String, suggestion: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42S02" for an unknown table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Schema error: {message} (object: {object})")]
    Schema { message: String, object: String },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a classification denial.
    pub fn query_denied(reason: impl Into<String>) -> Self {
        Self::QueryDenied {
            reason: reason.into(),
        }
    }

    /// Wrap a downstream failure with the operation that was running.
    pub fn execution(operation: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Execution {
            operation: operation.into(),
            message: source.to_string(),
        }
    }

    /// Create a startup error with a helpful suggestion.
    pub fn startup(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Startup {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    pub fn schema(message: impl Into<String>, object: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            object: object.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Startup { suggestion, .. } => Some(suggestion),
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// True for failures that end the process rather than a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Startup { .. })
    }

    /// Attach the running operation to a downstream failure.
    ///
    /// Denials, startup failures and already-wrapped errors pass through.
    pub fn in_operation(self, operation: &str) -> Self {
        match self {
            Self::Startup { .. } | Self::QueryDenied { .. } | Self::Execution { .. } => self,
            other => Self::execution(operation, other),
        }
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::connection(
                msg.to_string(),
                "Check the MYSQL_* settings or DATABASE_URL",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::database(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::RowNotFound => DbError::database(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            sqlx::Error::PoolTimedOut => DbError::connection(
                "Timed out waiting for a pooled connection",
                "Raise MYSQL_CONNECTION_LIMIT or MYSQL_ACQUIRE_TIMEOUT",
            ),
            sqlx::Error::PoolClosed => {
                DbError::connection("Connection pool is closed", "The server is shutting down")
            }
            sqlx::Error::Io(io_err) => DbError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => DbError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => DbError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::TypeNotFound { type_name } => DbError::schema(
                format!("Type not found: {}", type_name),
                type_name.to_string(),
            ),
            sqlx::Error::ColumnNotFound(col) => {
                DbError::schema(format!("Column not found: {}", col), col.to_string())
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DbError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            _ => DbError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
