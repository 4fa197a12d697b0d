//! Configuration module for the flickr-dumper.
//!
//! This module handles:
//! - Loading API credentials from the secrets file
//! - Caching the access token between runs
//! - Run configuration and its validation

pub mod credentials;
pub mod loader;
pub mod validation;

pub use credentials::{Credentials, TokenCache};
pub use loader::Config;
pub use validation::{validate_config, validate_credentials};
