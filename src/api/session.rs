//! Interactive authorization and token reuse.

use std::path::Path;

use url::Url;

use crate::api::client::{Endpoints, FlickrApi};
use crate::config::{Credentials, TokenCache};
use crate::error::{Error, Result};

/// Produce an authenticated client.
///
/// Reuses the cached token when it still grants read access; otherwise runs
/// the out-of-band flow, calling `prompt` with the authorization URL to obtain
/// the verifier code. Must complete before any download work starts.
pub async fn authorize<P>(
    credentials: Credentials,
    endpoints: Endpoints,
    cache_path: &Path,
    prompt: P,
) -> Result<FlickrApi>
where
    P: FnOnce(&Url) -> Result<String>,
{
    let api = FlickrApi::new(credentials, endpoints)?;

    if let Some(cache) = TokenCache::load(cache_path) {
        let cached = api.clone().with_token(cache.oauth_token());
        match cached.check_token().await {
            Ok(info) if info.allows_read() => {
                tracing::info!(
                    "Authorization was successful (cached token for {} ({}))",
                    info.user.username,
                    info.user.nsid
                );
                return Ok(cached);
            }
            Ok(info) => {
                tracing::warn!(
                    "Cached token only grants '{}' permission, re-authorizing",
                    info.perms.content
                );
            }
            Err(e) => {
                tracing::warn!("Cached token is no longer valid: {}", e);
            }
        }
    }

    let request_token = api.request_token().await?;
    let authorize_url = api.authorize_url(&request_token)?;
    tracing::debug!("Authorization URL: {}", authorize_url);

    let verifier = prompt(&authorize_url)?;
    let verifier = verifier.trim();
    if verifier.is_empty() {
        return Err(Error::Auth("No verifier code entered".into()));
    }

    let grant = api.access_token(&request_token, verifier).await?;

    let cache = TokenCache {
        token: grant.token.token.clone(),
        token_secret: grant.token.secret.clone(),
        user_nsid: grant.user_nsid.clone(),
        username: grant.username.clone(),
        authorized_at: Some(chrono::Utc::now()),
    };
    if let Err(e) = cache.save(cache_path) {
        tracing::warn!("Failed to save token cache {}: {}", cache_path.display(), e);
    }

    tracing::info!("Authorization was successful");
    Ok(api.with_token(grant.token))
}
