//! Configuration validation logic.

use regex::Regex;
use tokio::sync::Semaphore;

use crate::config::loader::Config;
use crate::config::Credentials;
use crate::error::{Error, Result};

/// Validate the run configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_dirname(config)?;

    if config.page_size == 0 || config.page_size > crate::api::PAGE_SIZE {
        return Err(Error::ConfigValidation {
            field: "page_size".to_string(),
            message: format!(
                "Page size must be between 1 and {} (got {})",
                crate::api::PAGE_SIZE,
                config.page_size
            ),
        });
    }

    if config.concurrency > Semaphore::MAX_PERMITS {
        return Err(Error::ConfigValidation {
            field: "concurrency".to_string(),
            message: format!(
                "Concurrency must be at most {} (got {})",
                Semaphore::MAX_PERMITS,
                config.concurrency
            ),
        });
    }

    Ok(())
}

/// Validate the target directory name.
///
/// Whether the path is usable as a directory is checked when it is created.
pub fn validate_dirname(config: &Config) -> Result<()> {
    let dir = &config.directory;

    if dir.as_os_str().is_empty() {
        return Err(Error::MissingConfig("dirname".to_string()));
    }

    Ok(())
}

/// Validate the API key and secret.
pub fn validate_credentials(credentials: &Credentials) -> Result<()> {
    validate_hex_field("api_key", &credentials.api_key)?;
    validate_hex_field("api_secret", &credentials.api_secret)?;
    Ok(())
}

fn validate_hex_field(field: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    let lower = value.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "{} appears to be a placeholder. Please provide the value Flickr issued.",
                field
            ),
        });
    }

    // Flickr issues keys and secrets as hexadecimal strings
    let hex_pattern = Regex::new(r"^[0-9a-fA-F]+$").map_err(|e| Error::Config(e.to_string()))?;
    if !hex_pattern.is_match(value) {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("{} must be a hexadecimal string", field),
        });
    }

    Ok(())
}
