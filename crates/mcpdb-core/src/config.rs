use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Launch command written into the MCP config (optional `[server]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Executable the desktop client starts.
    pub command: String,
    /// Arguments passed to `command`.
    pub args: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: "uvx".to_string(),
            args: vec![
                "--from".to_string(),
                "mcp-alchemy".to_string(),
                "mcp-alchemy".to_string(),
            ],
        }
    }
}

/// HTTP transfer limits (optional `[http]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole transfer (0 = no limit).
    pub timeout_secs: u64,
    /// User-Agent header; None leaves libcurl's default.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            user_agent: Some(concat!("mcpdb/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

/// Global configuration loaded from `~/.config/mcpdb/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpdbConfig {
    /// Directory the database is downloaded into (relative paths resolve against the cwd).
    pub data_dir: PathBuf,
    /// Filename of the downloaded database; its stem names the MCP server.
    pub db_filename: String,
    /// Directory the launch config is written into.
    pub output_dir: PathBuf,
    /// Launch config filename is `<prefix><identifier>.json`.
    pub config_filename_prefix: String,
    pub server: ServerConfig,
    pub http: HttpConfig,
}

impl Default for McpdbConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            db_filename: "DxO_Revenues_Magento_Empilement.db".to_string(),
            output_dir: PathBuf::from("output"),
            config_filename_prefix: "claude_desktop_config_".to_string(),
            server: ServerConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl McpdbConfig {
    /// Where the database lands: `data_dir/db_filename`.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_filename)
    }

    /// Where the launch config lands: `output_dir/<prefix><identifier>.json`.
    pub fn launch_config_path(&self, identifier: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.json", self.config_filename_prefix, identifier))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mcpdb")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<McpdbConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<McpdbConfig> {
    if !path.exists() {
        let default_cfg = McpdbConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: McpdbConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
