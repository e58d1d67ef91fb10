//! Console summary printed after a successful run.

use super::Outcome;
use std::fmt::Write;

const TITLE: &str = " Claude Desktop MCP Configuration ";

pub fn render_summary(outcome: &Outcome) -> String {
    let side = "-".repeat(15);
    let rule = "-".repeat(30 + TITLE.len());

    let mut out = String::new();
    let _ = writeln!(out, "Database file saved to: {}", outcome.db_path.display());
    let _ = writeln!(out, "SHA-256: {}", outcome.sha256);
    let _ = writeln!(out, "Launch config saved to: {}", outcome.config_path.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}{}{}", side, TITLE, side);
    let _ = writeln!(out, "{}", outcome.json);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(out, "Instructions for Claude Desktop:");
    let _ = writeln!(out, "1. Open Claude Desktop settings -> developers -> edit config");
    let _ = writeln!(out, "2. Copy the JSON configuration printed above.");
    let _ = writeln!(out, "3. Paste it into the config file.");
    let _ = writeln!(out, "{}", rule);
    out
}
