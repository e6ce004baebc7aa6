//! MySQL MCP Server - Main entry point.
//!
//! Exposes read-only MySQL access as MCP tools over stdio.

use mysql_mcp_server::config::Config;
use mysql_mcp_server::db::ConnectionManager;
use mysql_mcp_server::transport::{StdioTransport, Transport};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries the MCP protocol.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse_args();

    init_tracing(&config);

    info!("Starting MySQL MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let conn_config = match config.connection_config() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let connection_manager = Arc::new(ConnectionManager::new(conn_config));

    if let Err(e) = connection_manager.initialize().await {
        error!(
            error = %e,
            suggestion = e.suggestion().unwrap_or_default(),
            "Could not connect to the database"
        );
        return ExitCode::FAILURE;
    }

    info!(
        db_type = %connection_manager.db_type(),
        server_version = connection_manager.server_version().unwrap_or("unknown"),
        "Database ready"
    );

    let transport = StdioTransport::new(connection_manager);
    info!(transport = transport.name(), "Serving");

    if let Err(e) = transport.run().await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}
