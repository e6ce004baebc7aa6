//! Connection-related data models.

use crate::config::PoolOptions;
use serde::{Deserialize, Serialize};
use url::Url;

/// Supported database types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// Includes MariaDB
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Parse database type from a connection string.
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let lower = connection_string.trim().to_lowercase();
        if lower.starts_with("mysql://") || lower.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if lower.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Where the pool connects to.
#[derive(Clone)]
pub enum ConnectionTarget {
    /// Discrete MySQL settings from `MYSQL_*`.
    MySql {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: Option<String>,
    },
    /// A full `mysql://` or `sqlite:` URL. Contains sensitive data - never log.
    Url(String),
}

impl ConnectionTarget {
    /// Display-safe description of the target (credentials masked).
    pub fn masked(&self) -> String {
        match self {
            Self::MySql {
                host,
                port,
                user,
                database,
                ..
            } => format!(
                "mysql://{}:****@{}:{}/{}",
                user,
                host,
                port,
                database.as_deref().unwrap_or("")
            ),
            Self::Url(raw) => mask_url(raw),
        }
    }
}

impl std::fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConnectionTarget")
            .field(&self.masked())
            .finish()
    }
}

fn mask_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("****")).is_ok() {
                url.to_string()
            } else {
                "<redacted>".to_string()
            }
        }
        Ok(url) => url.to_string(),
        Err(_) => "<redacted>".to_string(),
    }
}

/// Configuration for the single process-wide pool.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub db_type: DatabaseType,
    pub target: ConnectionTarget,
    pub pool_options: PoolOptions,
}

impl ConnectionConfig {
    /// Build a config from a connection URL with default pool options.
    pub fn from_url(connection_string: impl Into<String>) -> Option<Self> {
        let connection_string = connection_string.into();
        let db_type = DatabaseType::from_connection_string(&connection_string)?;
        Some(Self {
            db_type,
            target: ConnectionTarget::Url(connection_string),
            pool_options: PoolOptions::default(),
        })
    }

    pub fn with_pool_options(mut self, pool_options: PoolOptions) -> Self {
        self.pool_options = pool_options;
        self
    }

    pub fn masked_connection_string(&self) -> String {
        self.target.masked()
    }
}
