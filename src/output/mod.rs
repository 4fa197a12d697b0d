//! Output module for interactive console output.
//!
//! Provides:
//! - Colored console messages
//! - The authorization prompt

pub mod console;

pub use console::{print_banner, print_error, print_info, print_warning, prompt_for_verifier};
