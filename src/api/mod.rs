//! Flickr API module.
//!
//! This module provides:
//! - HTTP client for the Flickr REST and OAuth endpoints
//! - OAuth 1.0a request signing
//! - Interactive authorization with token reuse
//! - API response types

pub mod auth;
pub mod client;
pub mod session;
pub mod types;

pub use auth::OAuthToken;
pub use client::{AccessGrant, Endpoints, FlickrApi, PAGE_SIZE};
pub use session::authorize;
pub use types::*;
