//! Shareable-link resolution.
//!
//! Turns the link a user copies out of a cloud drive ("Anyone with the link")
//! into a URL that serves the file bytes. Google Drive links are recognized
//! in their common shapes; every other http(s) URL is used as-is.

use crate::error::FetchError;
use url::Url;

/// Template value the link argument is rejected for.
pub const PLACEHOLDER_URL: &str = "YOUR_GOOGLE_DRIVE_SHAREABLE_LINK_HERE";

const DRIVE_HOSTS: &[&str] = &[
    "drive.google.com",
    "docs.google.com",
    "drive.usercontent.google.com",
];

const DRIVE_DOWNLOAD_ENDPOINT: &str = "https://drive.google.com/uc";

/// Direct URL plus what the downloader needs to know about where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: String,
    /// Set for Google Drive files; enables the confirmation-page hop.
    pub drive_id: Option<String>,
}

impl ResolvedLink {
    /// A plain URL downloaded without any Drive handling.
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            drive_id: None,
        }
    }

    pub fn is_drive(&self) -> bool {
        self.drive_id.is_some()
    }
}

/// Resolves a shareable link into a direct download URL.
///
/// # Examples
///
/// - `https://drive.google.com/file/d/ABC/view?usp=sharing` → `https://drive.google.com/uc?export=download&id=ABC`
/// - `https://example.com/data.db` → unchanged
pub fn resolve(input: &str) -> Result<ResolvedLink, FetchError> {
    let input = input.trim();
    if input.is_empty() || input == PLACEHOLDER_URL {
        return Err(FetchError::PlaceholderUrl);
    }

    let parsed = Url::parse(input).map_err(|_| FetchError::UnsupportedUrl(input.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedUrl(input.to_string()));
    }

    if !is_drive_host(parsed.host_str()) {
        return Ok(ResolvedLink::direct(input));
    }

    let id = drive_file_id(&parsed).ok_or_else(|| FetchError::MissingDriveId(input.to_string()))?;
    Ok(ResolvedLink {
        url: drive_download_url(&id),
        drive_id: Some(id),
    })
}

/// Direct-download endpoint for a Drive file id.
pub fn drive_download_url(id: &str) -> String {
    format!("{}?export=download&id={}", DRIVE_DOWNLOAD_ENDPOINT, id)
}

fn is_drive_host(host: Option<&str>) -> bool {
    host.map(|h| DRIVE_HOSTS.iter().any(|d| h.eq_ignore_ascii_case(d)))
        .unwrap_or(false)
}

/// File id from `?id=` or from the segment after `/d/`.
fn drive_file_id(url: &Url) -> Option<String> {
    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "id") {
        if is_valid_id(&id) {
            return Some(id.into_owned());
        }
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    segments
        .windows(2)
        .find(|w| w[0] == "d" && is_valid_id(w[1]))
        .map(|w| w[1].to_string())
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
