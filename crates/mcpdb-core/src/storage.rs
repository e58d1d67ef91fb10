//! Disk side of a download: stream into `<dest>.part`, then atomically
//! rename onto the destination.
//!
//! A writer that is dropped without `finalize` removes its temp file, so a
//! failed transfer never leaves partial data next to the destination.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

const BUF_SIZE: usize = 256 * 1024;

/// Path for the temp file: appends `.part` to the final path (e.g. `file.db` → `file.db.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Sequential writer for one transfer.
pub struct StorageWriter {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    written: u64,
    finalized: bool,
}

impl StorageWriter {
    /// Create `<final_path>.part`, creating parent directories as needed.
    /// Overwrites a temp file left over from an earlier run.
    pub fn create(final_path: &Path) -> Result<Self> {
        if let Some(parent) = final_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(Self {
            file: Some(BufWriter::with_capacity(BUF_SIZE, file)),
            temp_path,
            written: 0,
            finalized: false,
        })
    }

    /// Append `data`. Returns a plain `io::Error` so curl callbacks can stash it.
    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "storage already closed"))?;
        file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, fsync and close the temp file.
    fn close(&mut self) -> Result<()> {
        if let Some(mut f) = self.file.take() {
            f.flush().context("storage flush failed")?;
            f.get_ref().sync_all().context("storage sync failed")?;
        }
        Ok(())
    }

    /// Close and read back at most `limit` bytes, then discard the temp file.
    /// Used when the server answered with a page instead of the file.
    pub fn read_back(mut self, limit: u64) -> Result<Vec<u8>> {
        self.close()?;
        let mut buf = Vec::new();
        File::open(&self.temp_path)
            .with_context(|| format!("failed to reopen {}", self.temp_path.display()))?
            .take(limit)
            .read_to_end(&mut buf)
            .with_context(|| format!("failed to read {}", self.temp_path.display()))?;
        Ok(buf)
    }

    /// Sync and atomically rename the temp file onto `final_path`, replacing
    /// whatever was there. Returns the number of bytes written.
    pub fn finalize(mut self, final_path: &Path) -> Result<u64> {
        self.close()?;
        fs::rename(&self.temp_path, final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                final_path.display()
            )
        })?;
        self.finalized = true;
        Ok(self.written)
    }
}

impl Drop for StorageWriter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        drop(self.file.take());
        if let Err(e) = fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("could not remove {}: {}", self.temp_path.display(), e);
            }
        }
    }
}
