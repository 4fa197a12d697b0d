//! Download module for library export.
//!
//! This module provides:
//! - Collection and page enumeration
//! - Per-photo metadata lookup and streaming download
//! - Concurrent dispatch with a join barrier
//! - Run statistics

pub mod export;
pub mod fetcher;
pub mod scheduler;
pub mod state;
pub mod walker;

pub use export::{export_library, ExportOptions};
pub use fetcher::{create_photo_url, fetch_and_save, resolve_metadata};
pub use scheduler::{DispatchSummary, Dispatcher};
pub use state::{RunStats, RunSummary};
pub use walker::{page_count, walk, PageRef, Pages};
