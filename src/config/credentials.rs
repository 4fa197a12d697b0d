//! API credentials and the cached access token.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::auth::OAuthToken;
use crate::error::{Error, Result};

/// Consumer key and secret issued by Flickr, read from the secrets file.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Load credentials from a JSON secrets file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Secrets file not found: {}. Create it with your api_key and api_secret",
                    path.display()
                ))
            } else {
                Error::Config(format!("Cannot read {}: {}", path.display(), e))
            }
        })?;

        let credentials: Credentials = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Malformed secrets file {}: {}", path.display(), e))
        })?;

        if credentials.api_key.trim().is_empty() {
            return Err(Error::MissingConfig("api_key".to_string()));
        }
        if credentials.api_secret.trim().is_empty() {
            return Err(Error::MissingConfig("api_secret".to_string()));
        }

        Ok(credentials)
    }
}

/// Access token persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCache {
    pub token: String,
    pub token_secret: String,
    pub user_nsid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub authorized_at: Option<DateTime<Utc>>,
}

impl TokenCache {
    /// Load the cache. Absent or unreadable caches yield `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Ignoring token cache {}: {}", path.display(), e);
                return None;
            }
        };

        match toml::from_str(&content) {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!("Ignoring corrupt token cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save the cache as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The token pair used for request signing.
    pub fn oauth_token(&self) -> OAuthToken {
        OAuthToken {
            token: self.token.clone(),
            secret: self.token_secret.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_credentials() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api_secrets.json");
        fs::write(&path, r#"{"api_key": "k123", "api_secret": "s456"}"#).unwrap();

        let credentials = Credentials::load(&path).unwrap();
        assert_eq!(credentials.api_key, "k123");
        assert_eq!(credentials.api_secret, "s456");
    }

    #[test]
    fn test_missing_secrets_file() {
        let dir = tempdir().unwrap();
        let err = Credentials::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_secrets_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api_secrets.json");

        fs::write(&path, "api_key = 'not json'").unwrap();
        assert!(matches!(Credentials::load(&path), Err(Error::Config(_))));

        fs::write(&path, r#"{"api_key": "k123"}"#).unwrap();
        assert!(matches!(Credentials::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_secret_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api_secrets.json");
        fs::write(&path, r#"{"api_key": "k123", "api_secret": "  "}"#).unwrap();

        assert!(matches!(
            Credentials::load(&path),
            Err(Error::MissingConfig(field)) if field == "api_secret"
        ));
    }

    #[test]
    fn test_token_cache_roundtrip_and_corruption() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flickr-token.toml");
        assert_eq!(TokenCache::load(&path), None);

        let cache = TokenCache {
            token: "tok".into(),
            token_secret: "sec".into(),
            user_nsid: "1@N00".into(),
            username: "me".into(),
            authorized_at: None,
        };
        cache.save(&path).unwrap();
        assert_eq!(TokenCache::load(&path), Some(cache.clone()));
        assert_eq!(cache.oauth_token().secret, "sec");

        fs::write(&path, "token = ").unwrap();
        assert_eq!(TokenCache::load(&path), None);
    }
}
