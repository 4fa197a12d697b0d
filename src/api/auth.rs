//! OAuth 1.0a request signing utilities.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::error::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// Nonce length in characters.
const NONCE_LENGTH: usize = 32;

/// A token and its secret, either temporary (request) or long-lived (access).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub token: String,
    pub secret: String,
}

impl OAuthToken {
    /// Extract a token pair from a form-encoded OAuth endpoint response.
    pub fn from_form(fields: &HashMap<String, String>) -> Option<Self> {
        let token = fields.get("oauth_token").filter(|t| !t.is_empty())?;
        let secret = fields.get("oauth_token_secret").filter(|s| !s.is_empty())?;
        Some(Self {
            token: token.clone(),
            secret: secret.clone(),
        })
    }
}

/// Percent-encode a value, leaving only RFC 3986 unreserved characters.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Build the signature base string: `METHOD&url&sorted-params`.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

/// HMAC-SHA1 of `data` under `key`, base64 encoded.
fn hmac_sha1_base64(key: &[u8], data: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(key)
        .map_err(|e| Error::Auth(format!("Failed to initialise HMAC: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Sign a base string with the consumer secret and (possibly empty) token secret.
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    hmac_sha1_base64(key.as_bytes(), base_string)
}

/// Random alphanumeric nonce.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Protocol parameters common to every signed request.
pub fn protocol_params(consumer_key: &str, token: Option<&OAuthToken>) -> Vec<(String, String)> {
    let mut params = vec![
        ("oauth_consumer_key".to_string(), consumer_key.to_string()),
        ("oauth_nonce".to_string(), generate_nonce()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        (
            "oauth_timestamp".to_string(),
            chrono::Utc::now().timestamp().to_string(),
        ),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];
    if let Some(token) = token {
        params.push(("oauth_token".to_string(), token.token.clone()));
    }
    params
}

/// Append `oauth_signature` to a complete parameter list for a GET request.
pub fn sign_params(
    url: &str,
    mut params: Vec<(String, String)>,
    consumer_secret: &str,
    token: Option<&OAuthToken>,
) -> Result<Vec<(String, String)>> {
    let base = signature_base_string("GET", url, &params);
    let token_secret = token.map(|t| t.secret.as_str()).unwrap_or("");
    let signature = sign(&base, consumer_secret, token_secret)?;
    params.push(("oauth_signature".to_string(), signature));
    Ok(params)
}
