//! The download → checksum → launch config pipeline.

use anyhow::{Context, Result};
use mcpdb_core::config::McpdbConfig;
use mcpdb_core::downloader::{self, DownloadOptions};
use mcpdb_core::{checksum, filename, launch_config};
use std::fs;
use std::path::PathBuf;

/// Everything the summary needs after a successful run.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    pub sha256: String,
    /// Exactly what was written to `config_path`.
    pub json: String,
}

/// Downloads the database behind `url`, optionally verifies it, then writes
/// the launch config. The config is only written after a verified download.
pub fn run_pipeline(url: &str, expected_sha256: Option<&str>, cfg: &McpdbConfig) -> Result<Outcome> {
    tracing::info!("--- starting database download and config generation ---");
    let identifier = filename::identifier(&cfg.db_filename);
    tracing::info!("derived identifier: {}", identifier);

    let downloaded = downloader::download(url, &cfg.db_path(), &DownloadOptions::from(&cfg.http))
        .context("database download failed")?;

    let sha256 = match expected_sha256 {
        Some(expected) => checksum::verify(&downloaded.path, expected)?,
        None => checksum::sha256_path(&downloaded.path)?,
    };
    tracing::info!("database sha256: {}", sha256);

    let config_path = cfg.launch_config_path(&identifier);
    let json = launch_config::write(&downloaded.path, &config_path, &identifier, &cfg.server)
        .context("launch config generation failed")?;
    let config_path = fs::canonicalize(&config_path)
        .with_context(|| format!("failed to resolve {}", config_path.display()))?;

    tracing::info!("--- finished successfully ---");
    Ok(Outcome {
        db_path: downloaded.path,
        config_path,
        sha256,
        json,
    })
}
