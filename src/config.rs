//! Configuration handling for the MySQL MCP Server.
//!
//! Settings come from CLI arguments with environment variable fallbacks and
//! are read once at startup.

use crate::models::{ConnectionConfig, ConnectionTarget, DatabaseType};
use clap::Parser;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_MYSQL_USER: &str = "root";

// Pool configuration defaults
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 60;

/// Connection pool configuration options.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolOptions {
    /// Maximum live connections; callers beyond this wait in the acquire queue.
    pub max_connections: u32,
    /// How long a caller may wait for a free connection.
    pub acquire_timeout_secs: u64,
    /// Idle connections are closed after this long.
    pub idle_timeout_secs: u64,
    /// Upper bound for one statement, acquisition excluded.
    pub query_timeout_secs: u64,
    pub test_before_acquire: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            test_before_acquire: true,
        }
    }
}

impl PoolOptions {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Validate pool options and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("connection limit must be greater than 0".to_string());
        }
        if self.acquire_timeout_secs == 0 {
            return Err("acquire timeout must be greater than 0".to_string());
        }
        if self.query_timeout_secs == 0 {
            return Err("query timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Configuration for the MySQL MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mysql-mcp-server",
    about = "Read-only MCP server that lets AI assistants query MySQL databases",
    version,
    author
)]
pub struct Config {
    /// MySQL server host
    #[arg(long, default_value = DEFAULT_MYSQL_HOST, env = "MYSQL_HOST")]
    pub host: String,

    /// MySQL server port
    #[arg(long, default_value_t = DEFAULT_MYSQL_PORT, env = "MYSQL_PORT")]
    pub port: u16,

    /// MySQL user name
    #[arg(long, default_value = DEFAULT_MYSQL_USER, env = "MYSQL_USER")]
    pub user: String,

    /// MySQL password
    #[arg(long, default_value = "", env = "MYSQL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Default database (schema) for queries and introspection
    #[arg(long, env = "MYSQL_DATABASE")]
    pub database: Option<String>,

    /// Full connection URL (mysql://... or sqlite:...). Overrides the discrete MySQL settings.
    #[arg(
        long = "database-url",
        value_name = "URL",
        env = "DATABASE_URL",
        hide_env_values = true
    )]
    pub database_url: Option<String>,

    /// Maximum number of pooled connections
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CONNECTIONS,
        env = "MYSQL_CONNECTION_LIMIT"
    )]
    pub connection_limit: u32,

    /// Seconds to wait for a free pooled connection
    #[arg(
        long,
        default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS,
        env = "MYSQL_ACQUIRE_TIMEOUT"
    )]
    pub acquire_timeout: u64,

    /// Seconds before an idle pooled connection is closed
    #[arg(
        long,
        default_value_t = DEFAULT_IDLE_TIMEOUT_SECS,
        env = "MYSQL_IDLE_TIMEOUT"
    )]
    pub idle_timeout: u64,

    /// Seconds a single statement may run
    #[arg(
        long,
        default_value_t = DEFAULT_QUERY_TIMEOUT_SECS,
        env = "MYSQL_QUERY_TIMEOUT"
    )]
    pub query_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            host: DEFAULT_MYSQL_HOST.to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: DEFAULT_MYSQL_USER.to_string(),
            password: String::new(),
            database: None,
            database_url: None,
            connection_limit: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT_SECS,
            query_timeout: DEFAULT_QUERY_TIMEOUT_SECS,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_connections: self.connection_limit,
            acquire_timeout_secs: self.acquire_timeout,
            idle_timeout_secs: self.idle_timeout,
            query_timeout_secs: self.query_timeout,
            test_before_acquire: true,
        }
    }

    /// Resolve the settings into a validated connection configuration.
    ///
    /// `DATABASE_URL` wins over the discrete `MYSQL_*` settings when both are given.
    pub fn connection_config(&self) -> Result<ConnectionConfig, String> {
        let pool_options = self.pool_options();
        pool_options.validate()?;

        let Some(raw_url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(ConnectionConfig {
                db_type: DatabaseType::MySQL,
                target: ConnectionTarget::MySql {
                    host: self.host.clone(),
                    port: self.port,
                    user: self.user.clone(),
                    password: self.password.clone(),
                    database: self.database.clone().filter(|d| !d.is_empty()),
                },
                pool_options,
            });
        };

        let db_type = DatabaseType::from_connection_string(raw_url)
            .ok_or_else(|| "DATABASE_URL must start with mysql:// or sqlite:".to_string())?;

        // SQLite URLs like `sqlite:data.db` are not hierarchical, so only MySQL is
        // checked structurally here; sqlx rejects malformed SQLite URLs at connect time.
        if db_type == DatabaseType::MySQL {
            Url::parse(raw_url).map_err(|e| format!("Invalid DATABASE_URL: {e}"))?;
        }

        Ok(ConnectionConfig {
            db_type,
            target: ConnectionTarget::Url(raw_url.to_string()),
            pool_options,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
