//! MCP launch configuration for desktop clients.
//!
//! Shape on disk:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "sqlite_db_<identifier>": {
//!       "command": "uvx",
//!       "args": ["--from", "mcp-alchemy", "mcp-alchemy"],
//!       "env": { "DB_URL": "sqlite:///<absolute path>" }
//!     }
//!   }
//! }
//! ```

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Environment variable carrying the database connection string.
pub const DB_URL_ENV: &str = "DB_URL";

const SERVER_KEY_PREFIX: &str = "sqlite_db_";

/// How a client should start one MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDescriptor {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Top-level document: server name → launch descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaunchConfig {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: BTreeMap<String, LaunchDescriptor>,
}

/// Connection string for a SQLite file: `sqlite:///` followed by the path verbatim.
pub fn sqlite_url(db_abs_path: &Path) -> String {
    format!("sqlite:///{}", db_abs_path.display())
}

/// Server key for an identifier, e.g. `sqlite_db_sales`.
pub fn server_name(identifier: &str) -> String {
    format!("{}{}", SERVER_KEY_PREFIX, identifier)
}

impl LaunchConfig {
    /// One-server config pointing `server` at the database at `db_abs_path`.
    pub fn for_database(db_abs_path: &Path, identifier: &str, server: &ServerConfig) -> Self {
        let mut env = BTreeMap::new();
        env.insert(DB_URL_ENV.to_string(), sqlite_url(db_abs_path));

        let mut mcp_servers = BTreeMap::new();
        mcp_servers.insert(
            server_name(identifier),
            LaunchDescriptor {
                command: server.command.clone(),
                args: server.args.clone(),
                env,
            },
        );
        Self { mcp_servers }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize launch config")
    }
}

/// Builds the launch config and writes it to `output_path`, creating the
/// parent directory and replacing any previous file. Returns the JSON written.
pub fn write(
    db_abs_path: &Path,
    output_path: &Path,
    identifier: &str,
    server: &ServerConfig,
) -> Result<String> {
    tracing::info!("writing launch config to {}", output_path.display());
    let json = LaunchConfig::for_database(db_abs_path, identifier, server).to_json()?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tracing::debug!("ensuring output directory exists: {}", parent.display());
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(output_path, &json)
        .with_context(|| format!("could not save launch config to {}", output_path.display()))?;
    Ok(json)
}
