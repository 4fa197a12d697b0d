//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::loader::{
    Config, DEFAULT_CONCURRENCY, DEFAULT_DIRNAME, DEFAULT_LOG_FILE, DEFAULT_SECRETS_FILE,
    DEFAULT_TOKEN_CACHE,
};

/// Flickr library exporter CLI.
#[derive(Parser, Debug)]
#[command(
    name = "flickr-dumper",
    version,
    about = "Download the whole Flickr library on your local disk",
    long_about = "Exports every photo of every photoset you own into one directory.\n\n\
                  Completed photo ids are recorded in stats.log inside the directory, \
                  so re-running only fetches what is missing."
)]
pub struct Args {
    /// Directory name for downloaded photos.
    #[arg(short, long, default_value = DEFAULT_DIRNAME)]
    pub dirname: PathBuf,

    /// JSON file with api_key and api_secret.
    #[arg(short, long, env = "FLICKR_SECRETS", default_value = DEFAULT_SECRETS_FILE)]
    pub secrets: PathBuf,

    /// Where the access token is cached between runs.
    #[arg(long, default_value = DEFAULT_TOKEN_CACHE)]
    pub token_cache: PathBuf,

    /// Maximum concurrent downloads (0 = unbounded).
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Debug log file.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Enable debug logging on the console.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Build the run configuration.
    pub fn into_config(self) -> Config {
        Config {
            directory: self.dirname,
            secrets_path: self.secrets,
            token_cache_path: self.token_cache,
            concurrency: self.concurrency,
            log_file: self.log_file,
            debug: self.debug,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Args::try_parse_from(["flickr-dumper"]).unwrap().into_config();
        assert_eq!(config.directory, PathBuf::from("photos"));
        assert_eq!(config.token_cache_path, PathBuf::from("flickr-token.toml"));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.page_size, 500);
        assert!(!config.debug);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "flickr-dumper",
            "-d",
            "backup",
            "--secrets",
            "keys.json",
            "-j",
            "0",
            "--debug",
        ])
        .unwrap();
        let config = args.into_config();

        assert_eq!(config.directory, PathBuf::from("backup"));
        assert_eq!(config.secrets_path, PathBuf::from("keys.json"));
        assert_eq!(config.concurrency, 0);
        assert!(config.debug);
    }
}
