//! CLI for mcpdb.

mod run;
mod summary;

use anyhow::{bail, Result};
use clap::Parser;
use mcpdb_core::config::{self, McpdbConfig};
use mcpdb_core::{filename, logging};
use std::path::PathBuf;

pub use run::{run_pipeline, Outcome};
pub use summary::render_summary;

/// Download a database from a shareable link and generate a Claude Desktop MCP config.
#[derive(Debug, Parser)]
#[command(name = "mcpdb", version)]
#[command(
    about = "Download a database from a shareable link and generate a Claude Desktop MCP config",
    long_about = None
)]
pub struct Cli {
    /// Shareable link to the database file (sharing must be "Anyone with the link").
    pub url: String,

    /// Directory to download the database into (default from config: data).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Filename for the downloaded database; its stem names the MCP server.
    #[arg(long, value_name = "NAME")]
    pub db_name: Option<String>,

    /// Directory to write the launch config into (default from config: output).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Command the desktop client runs to start the MCP server.
    #[arg(long = "command", value_name = "CMD")]
    pub server_command: Option<String>,

    /// Expected SHA-256 of the database; the run fails on mismatch.
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,

    /// Log to ~/.local/state/mcpdb/mcpdb.log instead of stderr.
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        logging::init(cli.log_file);

        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        cli.apply(&mut cfg)?;

        let outcome = run_pipeline(&cli.url, cli.sha256.as_deref(), &cfg)?;
        print!("{}", render_summary(&outcome));
        Ok(())
    }

    /// Overlay command-line flags on the file configuration.
    pub fn apply(&self, cfg: &mut McpdbConfig) -> Result<()> {
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(name) = &self.db_name {
            let clean = filename::sanitize(name);
            if clean.is_empty() {
                bail!("--db-name {:?} is not a usable filename", name);
            }
            if clean != *name {
                tracing::warn!("--db-name {:?} sanitized to {:?}", name, clean);
            }
            cfg.db_filename = clean;
        }
        if let Some(cmd) = &self.server_command {
            cfg.server.command = cmd.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
