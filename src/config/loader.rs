//! Run configuration assembled from the command line.

use std::path::PathBuf;

use crate::api::PAGE_SIZE;
use crate::download::ExportOptions;

/// Default target directory.
pub const DEFAULT_DIRNAME: &str = "photos";

/// Default secrets file.
pub const DEFAULT_SECRETS_FILE: &str = "api_secrets.json";

/// Default token cache file.
pub const DEFAULT_TOKEN_CACHE: &str = "flickr-token.toml";

/// Default debug log file.
pub const DEFAULT_LOG_FILE: &str = "debug.log";

/// Default number of concurrent downloads.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where photos and the manifest are written.
    pub directory: PathBuf,

    /// JSON file holding `api_key` and `api_secret`.
    pub secrets_path: PathBuf,

    /// TOML file caching the access token between runs.
    pub token_cache_path: PathBuf,

    /// Maximum concurrent downloads, 0 for unbounded.
    pub concurrency: usize,

    /// Photos requested per listing page.
    pub page_size: u64,

    /// Debug-level log destination.
    pub log_file: PathBuf,

    /// Show debug output on the console as well.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_DIRNAME),
            secrets_path: PathBuf::from(DEFAULT_SECRETS_FILE),
            token_cache_path: PathBuf::from(DEFAULT_TOKEN_CACHE),
            concurrency: DEFAULT_CONCURRENCY,
            page_size: PAGE_SIZE,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug: false,
        }
    }
}

impl Config {
    /// Options for the export phase.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            directory: self.directory.clone(),
            page_size: self.page_size,
            concurrency: self.concurrency,
        }
    }
}
