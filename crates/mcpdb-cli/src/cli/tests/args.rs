//! Tests for argument parsing and config overrides.

use super::parse;
use crate::cli::Cli;
use clap::Parser;
use mcpdb_core::config::McpdbConfig;
use std::path::Path;

#[test]
fn cli_parse_url_only() {
    let cli = parse(&["mcpdb", "https://drive.google.com/file/d/ABC/view"]);
    assert_eq!(cli.url, "https://drive.google.com/file/d/ABC/view");
    assert!(cli.data_dir.is_none());
    assert!(cli.db_name.is_none());
    assert!(cli.output_dir.is_none());
    assert!(cli.server_command.is_none());
    assert!(cli.sha256.is_none());
    assert!(!cli.log_file);
}

#[test]
fn cli_parse_all_flags() {
    let cli = parse(&[
        "mcpdb",
        "https://example.com/x.db",
        "--data-dir",
        "/tmp/data",
        "--db-name",
        "sales.db",
        "--output-dir",
        "/tmp/out",
        "--command",
        "mcp-sqlite",
        "--sha256",
        "abcd",
        "--log-file",
    ]);
    assert_eq!(cli.data_dir.as_deref(), Some(Path::new("/tmp/data")));
    assert_eq!(cli.db_name.as_deref(), Some("sales.db"));
    assert_eq!(cli.output_dir.as_deref(), Some(Path::new("/tmp/out")));
    assert_eq!(cli.server_command.as_deref(), Some("mcp-sqlite"));
    assert_eq!(cli.sha256.as_deref(), Some("abcd"));
    assert!(cli.log_file);
}

#[test]
fn cli_requires_url() {
    assert!(Cli::try_parse_from(["mcpdb"]).is_err());
}

#[test]
fn cli_rejects_second_positional() {
    assert!(Cli::try_parse_from(["mcpdb", "https://a/x", "https://b/y"]).is_err());
}

#[test]
fn apply_overrides_config() {
    let cli = parse(&[
        "mcpdb",
        "https://example.com/x.db",
        "--data-dir",
        "dl",
        "--db-name",
        "sales.db",
        "--command",
        "mcp-sqlite",
    ]);
    let mut cfg = McpdbConfig::default();
    cli.apply(&mut cfg).unwrap();
    assert_eq!(cfg.db_path(), Path::new("dl").join("sales.db"));
    assert_eq!(cfg.output_dir, Path::new("output"));
    assert_eq!(cfg.server.command, "mcp-sqlite");
    assert_eq!(cfg.server.args, McpdbConfig::default().server.args);
}

#[test]
fn apply_sanitizes_db_name() {
    let cli = parse(&["mcpdb", "https://example.com/x.db", "--db-name", "../evil.db"]);
    let mut cfg = McpdbConfig::default();
    cli.apply(&mut cfg).unwrap();
    assert_eq!(cfg.db_filename, "evil.db");
}

#[test]
fn apply_rejects_unusable_db_name() {
    let cli = parse(&["mcpdb", "https://example.com/x.db", "--db-name", ".."]);
    let mut cfg = McpdbConfig::default();
    assert!(cli.apply(&mut cfg).is_err());
}
