//! Failures the downloader can report by kind.
//!
//! Everything else (I/O, curl setup) travels as `anyhow::Error` with context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The link is empty or still the template placeholder.
    #[error(
        "no shareable link given; pass a real link whose sharing is set to \"Anyone with the link\""
    )]
    PlaceholderUrl,

    /// Not an absolute http(s) URL.
    #[error("unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// Drive-hosted URL without a recognizable file id.
    #[error("could not find a Drive file id in {0}")]
    MissingDriveId(String),

    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },

    /// Server announced a length and closed early.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },

    #[error("file is not publicly shared; set link sharing to \"Anyone with the link\"")]
    NotShared,

    /// Drive served an error page instead of the file (quota, removed, ...).
    #[error("Drive refused the download: {0}")]
    DriveRefused(String),

    #[error("Drive served another confirmation page after following the confirmation link")]
    ConfirmationLoop,

    #[error("download finished but {} was not found", .0.display())]
    MissingOutput(PathBuf),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}
