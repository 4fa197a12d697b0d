//! Filesystem module.
//!
//! Provides:
//! - Target directory management
//! - Deterministic photo file names

pub mod paths;

pub use paths::{ensure_dir, partial_path, photo_file_name, photo_path};
