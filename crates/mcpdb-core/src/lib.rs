pub mod config;
pub mod logging;

pub mod checksum;
pub mod confirm_page;
pub mod downloader;
pub mod error;
pub mod filename;
pub mod launch_config;
pub mod share_link;
pub mod storage;

pub use error::FetchError;
