//! Manifest module.
//!
//! Provides:
//! - Loading the append-only log of downloaded photo ids
//! - Serialized single-line appends
//! - Live dedup across concurrent workers

pub mod log;

pub use log::{append, load, Manifest, MANIFEST_FILE};
