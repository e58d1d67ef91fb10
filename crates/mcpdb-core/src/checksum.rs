//! Optional checksum verification (SHA-256) after the download completes.

use crate::error::FetchError;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hash `path` and compare against `expected` (hex, case-insensitive).
/// Returns the computed digest on match.
pub fn verify(path: &Path, expected: &str) -> Result<String> {
    let actual = sha256_path(path)?;
    let expected = expected.trim().to_ascii_lowercase();
    if actual != expected {
        return Err(FetchError::ChecksumMismatch { expected, actual }.into());
    }
    Ok(actual)
}
