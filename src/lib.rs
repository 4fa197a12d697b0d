//! Flickr Dumper - export a whole Flickr photo library to local disk
//!
//! This library provides the pieces of a resumable bulk export.
//!
//! # Features
//!
//! - OAuth 1.0a out-of-band authorization with a cached access token
//! - Enumeration of every photoset and listing page
//! - Deduplication against an append-only manifest (`stats.log`)
//! - Concurrent streaming downloads with a completion barrier
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use flickr_dumper::{authorize, export_library, Credentials, Endpoints, ExportOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::load(Path::new("api_secrets.json"))?;
//!     let api = authorize(
//!         credentials,
//!         Endpoints::default(),
//!         Path::new("flickr-token.toml"),
//!         flickr_dumper::output::prompt_for_verifier,
//!     )
//!     .await?;
//!
//!     let summary = export_library(Arc::new(api), &ExportOptions::new("photos")).await?;
//!     println!("{} photos saved", summary.saved);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod output;

// Re-exports for convenience
pub use api::{authorize, Endpoints, FlickrApi};
pub use config::{Config, Credentials};
pub use download::{export_library, fetch_and_save, ExportOptions, RunSummary};
pub use error::{Error, Result};
pub use manifest::Manifest;
