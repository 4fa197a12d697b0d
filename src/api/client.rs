//! Flickr API HTTP client.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::auth::{protocol_params, sign_params, OAuthToken};
use crate::api::types::*;
use crate::config::Credentials;
use crate::error::{Error, Result};

/// Flickr REST endpoint.
pub const REST_URL: &str = "https://api.flickr.com/services/rest";

/// Flickr OAuth endpoint prefix.
pub const OAUTH_URL: &str = "https://www.flickr.com/services/oauth";

/// Maximum page size accepted by the listing methods.
pub const PAGE_SIZE: u64 = 500;

/// Connect timeout (seconds) for every host.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Maximum silence (seconds) while waiting for headers or the next body chunk.
pub const READ_TIMEOUT_SECS: u64 = 60;

/// Remote hosts the client talks to, and how long it waits on them.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub rest: String,
    pub oauth: String,
    /// Replaces `https://farm{farm}.staticflickr.com` when set; the farm
    /// moves into the path as `{content}/farm{farm}/...`.
    pub content: Option<String>,
    pub connect_timeout: Duration,
    /// A stalled response fails after this long instead of hanging the run.
    pub read_timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rest: REST_URL.to_string(),
            oauth: OAUTH_URL.to_string(),
            content: None,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one base URL (used against mock servers).
    pub fn local(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            rest: format!("{}/services/rest", base),
            oauth: format!("{}/services/oauth", base),
            content: Some(format!("{}/content", base)),
            ..Self::default()
        }
    }
}

/// Access token granted by the verifier exchange.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub token: OAuthToken,
    pub user_nsid: String,
    pub username: String,
}

/// Flickr API client.
///
/// Holds one `reqwest::Client` so every request shares the connection pool.
/// Read-only once a token is attached; share it through an `Arc`.
#[derive(Clone)]
pub struct FlickrApi {
    client: Client,
    endpoints: Endpoints,
    credentials: Credentials,
    token: Option<OAuthToken>,
}

impl FlickrApi {
    /// Create an unauthenticated client.
    pub fn new(credentials: Credentials, endpoints: Endpoints) -> Result<Self> {
        // No overall timeout: originals can be large, only stalls are fatal
        let client = Client::builder()
            .user_agent(concat!("flickr-dumper/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(endpoints.connect_timeout)
            .read_timeout(endpoints.read_timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoints,
            credentials,
            token: None,
        })
    }

    /// Attach an access token.
    pub fn with_token(mut self, token: OAuthToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Whether an access token is attached.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Configured endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Call a REST method and decode its payload.
    async fn call<T: DeserializeOwned>(&self, method: &str, args: &[(&str, String)]) -> Result<T> {
        let url = &self.endpoints.rest;

        let mut params = protocol_params(&self.credentials.api_key, self.token.as_ref());
        params.push(("method".to_string(), method.to_string()));
        params.push(("format".to_string(), "json".to_string()));
        params.push(("nojsoncallback".to_string(), "1".to_string()));
        params.extend(args.iter().map(|(k, v)| (k.to_string(), v.clone())));
        let params = sign_params(url, params, &self.credentials.api_secret, self.token.as_ref())?;

        tracing::debug!("GET {} method={}", url, method);

        let response = self.client.get(url).query(&params).send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("{} response status: {}", method, status);

        if status == 401 || status == 403 {
            return Err(Error::Auth(format!("HTTP {}: {}", status, text)));
        }
        if !status.is_success() {
            return Err(Error::Api {
                code: i64::from(status.as_u16()),
                message: text,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| Error::Api {
            code: -1,
            message: format!(
                "Failed to parse {} response: {} - Response: {}",
                method,
                e,
                text.chars().take(500).collect::<String>()
            ),
        })?;

        if value.get("stat").and_then(|s| s.as_str()) != Some("ok") {
            return Err(Error::Api {
                code: value.get("code").and_then(|c| c.as_i64()).unwrap_or(-1),
                message: value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown failure")
                    .to_string(),
            });
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Signed GET against an OAuth endpoint; returns the form-encoded reply.
    async fn oauth_get(
        &self,
        endpoint: &str,
        extra: Vec<(String, String)>,
        token: Option<&OAuthToken>,
    ) -> Result<HashMap<String, String>> {
        let url = format!("{}/{}", self.endpoints.oauth, endpoint);

        let mut params = protocol_params(&self.credentials.api_key, token);
        params.extend(extra);
        let params = sign_params(&url, params, &self.credentials.api_secret, token)?;

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Auth(format!("{} request failed: {}", endpoint, e)))?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Auth(format!(
                "{} rejected with HTTP {}: {}",
                endpoint, status, text
            )));
        }

        Ok(url::form_urlencoded::parse(text.as_bytes())
            .into_owned()
            .collect())
    }

    /// Request a temporary token for the out-of-band flow.
    pub async fn request_token(&self) -> Result<OAuthToken> {
        let fields = self
            .oauth_get(
                "request_token",
                vec![("oauth_callback".to_string(), "oob".to_string())],
                None,
            )
            .await?;

        OAuthToken::from_form(&fields)
            .ok_or_else(|| Error::Auth("request_token response lacks a token".into()))
    }

    /// URL the user visits to grant read access.
    pub fn authorize_url(&self, request_token: &OAuthToken) -> Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.endpoints.oauth),
            &[("oauth_token", request_token.token.as_str()), ("perms", "read")],
        )?;
        Ok(url)
    }

    /// Exchange the verifier code for an access token.
    pub async fn access_token(
        &self,
        request_token: &OAuthToken,
        verifier: &str,
    ) -> Result<AccessGrant> {
        let fields = self
            .oauth_get(
                "access_token",
                vec![("oauth_verifier".to_string(), verifier.to_string())],
                Some(request_token),
            )
            .await?;

        let token = OAuthToken::from_form(&fields)
            .ok_or_else(|| Error::Auth("access_token response lacks a token".into()))?;

        Ok(AccessGrant {
            token,
            user_nsid: fields.get("user_nsid").cloned().unwrap_or_default(),
            username: fields.get("username").cloned().unwrap_or_default(),
        })
    }

    /// Inspect the attached token.
    pub async fn check_token(&self) -> Result<TokenInfo> {
        if !self.has_token() {
            return Err(Error::Auth("No access token".into()));
        }
        // oauth_token is already among the signed protocol parameters
        let response: CheckTokenResponse = self.call("flickr.auth.oauth.checkToken", &[]).await?;
        Ok(response.oauth)
    }

    /// Identify the authenticated user.
    pub async fn test_login(&self) -> Result<LoginUser> {
        let response: LoginResponse = self.call("flickr.test.login", &[]).await?;
        Ok(response.user)
    }

    /// List every collection owned by the user.
    pub async fn list_collections(&self, user_id: &str) -> Result<Vec<Collection>> {
        let mut collections = Vec::new();
        let mut page = 1u64;

        loop {
            let response: PhotosetsResponse = self
                .call(
                    "flickr.photosets.getList",
                    &[
                        ("user_id", user_id.to_string()),
                        ("page", page.to_string()),
                        ("per_page", PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let list = response.photosets;
            tracing::debug!(
                "Collections page {}/{}: {} entries",
                list.page,
                list.pages,
                list.photoset.len()
            );
            let empty = list.photoset.is_empty();
            collections.extend(list.photoset);

            if empty || page >= list.pages {
                break;
            }
            page += 1;
        }

        Ok(collections)
    }

    /// Fetch one page of a collection's photo listing.
    pub async fn list_collection_page(
        &self,
        collection_id: &str,
        user_id: &str,
        page: u64,
        per_page: u64,
    ) -> Result<PhotoPage> {
        let response: PhotosetPhotosResponse = self
            .call(
                "flickr.photosets.getPhotos",
                &[
                    ("photoset_id", collection_id.to_string()),
                    ("user_id", user_id.to_string()),
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                    ("media", "photos".to_string()),
                ],
            )
            .await?;
        Ok(response.photoset)
    }

    /// Look up a photo's hosting fields.
    pub async fn photo_info(&self, photo_id: &str, secret: &str) -> Result<PhotoInfo> {
        let response: PhotoInfoResponse = self
            .call(
                "flickr.photos.getInfo",
                &[
                    ("photo_id", photo_id.to_string()),
                    ("secret", secret.to_string()),
                ],
            )
            .await?;
        Ok(response.photo)
    }

    /// Start a plain GET for photo content.
    pub async fn download(&self, photo_id: &str, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(|e| Error::Fetch {
            photo_id: photo_id.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(Error::Fetch {
                photo_id: photo_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        Ok(response)
    }
}
