//! Flickr Dumper - CLI entry point.

use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{fmt, prelude::*};

use flickr_dumper::{
    api::{authorize, Endpoints},
    cli::Args,
    config::{validate_config, validate_credentials, Credentials},
    download::export_library,
    error::{exit_codes, Error, Result},
    fs::ensure_dir,
    output::{print_banner, print_error, print_info, print_warning, prompt_for_verifier},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            tracing::error!("{}", e);
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Auth(_) => ExitCode::from(exit_codes::AUTH_ERROR as u8),
                Error::Api { .. } | Error::Http(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

/// Console at info (or `RUST_LOG`), full debug detail in the log file.
fn init_logging(log_file: &Path, debug: bool) -> Result<()> {
    let console_level = if debug { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_level));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    let file_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy("flickr_dumper=debug");

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(file_filter),
        )
        .init();

    Ok(())
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();
    let config = args.into_config();

    // Set up logging
    init_logging(&config.log_file, config.debug)?;

    print_banner();

    // Configuration problems abort before any network activity
    validate_config(&config)?;
    let credentials = Credentials::load(&config.secrets_path)?;
    validate_credentials(&credentials)?;
    ensure_dir(&config.directory)?;

    // One-time interactive phase; nothing concurrent starts before it completes
    print_info("Connecting to Flickr...");
    let api = authorize(
        credentials,
        Endpoints::default(),
        &config.token_cache_path,
        prompt_for_verifier,
    )
    .await?;

    let summary = export_library(Arc::new(api), &config.export_options()).await?;

    if summary.failed > 0 || summary.pages_failed > 0 {
        print_warning(&format!(
            "{} photo(s) and {} page(s) failed; run again to retry them",
            summary.failed, summary.pages_failed
        ));
    }

    Ok(())
}
