//! Single-stream HTTP GET downloader.
//!
//! Resolves the shareable link, streams the body into `<dest>.part` and
//! renames it into place. Drive confirmation pages are followed once.

use crate::config::HttpConfig;
use crate::confirm_page;
use crate::error::FetchError;
use crate::share_link::{self, ResolvedLink};
use crate::storage::StorageWriter;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Progress is logged every this many bytes.
const PROGRESS_STEP: u64 = 8 * 1024 * 1024;

/// libcurl knobs for the transfer.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub connect_timeout: Duration,
    /// None = no overall limit.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for DownloadOptions {
    fn from(http: &HttpConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
            timeout: (http.timeout_secs > 0).then(|| Duration::from_secs(http.timeout_secs)),
            user_agent: http.user_agent.clone(),
        }
    }
}

/// A file that is on disk at `path` (absolute).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
}

/// What the server said about the body we just stored.
#[derive(Debug)]
struct Response {
    content_type: Option<String>,
    effective_url: Option<String>,
}

impl Response {
    fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/html"))
            .unwrap_or(false)
    }
}

/// Downloads the file behind the shareable link `link` to `dest`.
///
/// Parent directories are created; an existing file at `dest` is replaced.
/// Returns the canonical absolute path of the written file.
pub fn download(link: &str, dest: &Path, opts: &DownloadOptions) -> Result<Downloaded> {
    tracing::info!("resolving share link {}", link);
    let resolved = share_link::resolve(link)?;
    if let Some(id) = &resolved.drive_id {
        tracing::debug!(drive_id = %id, url = %resolved.url, "resolved Drive link");
    }
    download_resolved(&resolved, dest, opts)
}

/// Like [`download`] for a link that has already been resolved.
pub fn download_resolved(
    link: &ResolvedLink,
    dest: &Path,
    opts: &DownloadOptions,
) -> Result<Downloaded> {
    let mut easy = new_easy(opts)?;
    let mut url = link.url.clone();
    let mut followed_confirmation = false;

    tracing::info!("downloading to {}", dest.display());
    let bytes = loop {
        let mut storage = StorageWriter::create(dest)?;
        let response = fetch_into(&mut easy, &url, &mut storage)?;

        if link.is_drive() && response.is_html() {
            if followed_confirmation {
                return Err(FetchError::ConfirmationLoop.into());
            }
            let page_url = response.effective_url.unwrap_or_else(|| url.clone());
            let page = storage.read_back(confirm_page::MAX_PAGE_BYTES)?;
            url = confirm_page::confirmation_url(&String::from_utf8_lossy(&page), &page_url)?;
            tracing::info!("Drive asked for confirmation; following {}", url);
            followed_confirmation = true;
            continue;
        }

        break storage.finalize(dest)?;
    };

    if !dest.exists() {
        return Err(FetchError::MissingOutput(dest.to_path_buf()).into());
    }
    let path = fs::canonicalize(dest)
        .with_context(|| format!("failed to resolve absolute path of {}", dest.display()))?;
    tracing::info!("downloaded {} bytes to {}", bytes, path.display());
    Ok(Downloaded { path, bytes })
}

fn new_easy(opts: &DownloadOptions) -> Result<curl::easy::Easy> {
    let mut easy = curl::easy::Easy::new();
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    // Empty path turns on the in-memory cookie engine; Drive's confirmation
    // hop only works when its cookie is sent back.
    easy.cookie_file("")?;
    easy.connect_timeout(opts.connect_timeout)?;
    if let Some(timeout) = opts.timeout {
        easy.timeout(timeout)?;
    }
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua)?;
    }
    Ok(easy)
}

/// GET `url`, streaming the body into `storage`. Fails on non-2xx and on a
/// body shorter or longer than the announced `Content-Length`.
fn fetch_into(
    easy: &mut curl::easy::Easy,
    url: &str,
    storage: &mut StorageWriter,
) -> Result<Response> {
    easy.url(url).context("invalid URL")?;

    let mut write_err: Option<std::io::Error> = None;
    let mut next_report = PROGRESS_STEP;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match storage.write(data) {
            Ok(()) => {
                let written = storage.bytes_written();
                if written >= next_report {
                    tracing::debug!("received {} MiB", written / (1024 * 1024));
                    next_report = written + PROGRESS_STEP;
                }
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(anyhow::Error::new(e)
            .context(format!("failed to write {}", storage.temp_path().display())));
    }
    performed.with_context(|| format!("GET {} failed", url))?;

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            url: url.to_string(),
            code,
        }
        .into());
    }

    let announced = easy.content_length_download()?;
    let received = storage.bytes_written();
    if announced >= 0.0 && announced as u64 != received {
        return Err(FetchError::PartialTransfer {
            expected: announced as u64,
            received,
        }
        .into());
    }

    Ok(Response {
        content_type: easy.content_type()?.map(str::to_string),
        effective_url: easy.effective_url()?.map(str::to_string),
    })
}
