//! API response type definitions.

use serde::{Deserialize, Deserializer};

/// Flickr wraps most scalar strings as `{"_content": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(rename = "_content")]
    pub content: String,
}

/// Response of `flickr.test.login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
}

/// The authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub id: String,
    pub username: Content,
}

/// Response of `flickr.auth.oauth.checkToken`.
#[derive(Debug, Deserialize)]
pub struct CheckTokenResponse {
    pub oauth: TokenInfo,
}

/// Token details as reported by the remote.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub perms: Content,
    pub user: TokenUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenUser {
    pub nsid: String,
    pub username: String,
}

impl TokenInfo {
    /// Whether the token grants at least read access.
    pub fn allows_read(&self) -> bool {
        matches!(self.perms.content.as_str(), "read" | "write" | "delete")
    }
}

/// Response of `flickr.photosets.getList`.
#[derive(Debug, Deserialize)]
pub struct PhotosetsResponse {
    pub photosets: CollectionList,
}

/// One page of the user's collections.
#[derive(Debug, Deserialize)]
pub struct CollectionList {
    #[serde(default = "first_page", deserialize_with = "flexible_u64")]
    pub page: u64,
    #[serde(default = "first_page", deserialize_with = "flexible_u64")]
    pub pages: u64,
    #[serde(default)]
    pub photoset: Vec<Collection>,
}

/// A photoset owned by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    pub id: String,
    #[serde(rename = "photos", deserialize_with = "flexible_u64")]
    pub photo_count: u64,
    #[serde(default)]
    pub title: Option<Content>,
}

impl Collection {
    /// Human readable title, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.title
            .as_ref()
            .map(|t| t.content.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.id)
    }
}

/// Response of `flickr.photosets.getPhotos`.
#[derive(Debug, Deserialize)]
pub struct PhotosetPhotosResponse {
    pub photoset: PhotoPage,
}

/// One page of a photoset's photo listing.
#[derive(Debug, Deserialize)]
pub struct PhotoPage {
    pub id: String,
    #[serde(default = "first_page", deserialize_with = "flexible_u64")]
    pub page: u64,
    #[serde(default = "first_page", deserialize_with = "flexible_u64")]
    pub pages: u64,
    #[serde(default)]
    pub photo: Vec<PhotoRef>,
}

/// Identifies one photo within a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoRef {
    pub id: String,
    pub secret: String,
}

/// Response of `flickr.photos.getInfo`.
#[derive(Debug, Deserialize)]
pub struct PhotoInfoResponse {
    pub photo: PhotoInfo,
}

/// Raw photo info; only the hosting fields are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoInfo {
    #[serde(deserialize_with = "flexible_u64")]
    pub farm: u64,
    pub server: String,
    #[serde(default)]
    pub originalsecret: Option<String>,
}

/// Hosting location of a photo's original file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoMetadata {
    pub farm_id: u64,
    pub server_id: String,
    pub original_secret: String,
}

impl PhotoInfo {
    /// Resolve the hosting location, if the original is accessible.
    pub fn into_metadata(self) -> Option<PhotoMetadata> {
        let original_secret = self.originalsecret.filter(|s| !s.is_empty())?;
        Some(PhotoMetadata {
            farm_id: self.farm,
            server_id: self.server,
            original_secret,
        })
    }
}

fn first_page() -> u64 {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// Counts come back as numbers from some methods and strings from others.
fn flexible_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_counts_as_number_or_string() {
        let json = r#"{"photosets":{"page":1,"pages":"1","photoset":[
            {"id":"721","photos":3,"title":{"_content":"Holidays"}},
            {"id":"722","photos":"500","title":{"_content":""}}
        ]}}"#;
        let parsed: PhotosetsResponse = serde_json::from_str(json).unwrap();
        let sets = parsed.photosets.photoset;

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].photo_count, 3);
        assert_eq!(sets[0].display_name(), "Holidays");
        assert_eq!(sets[1].photo_count, 500);
        assert_eq!(sets[1].display_name(), "722");
    }

    #[test]
    fn test_photo_page_defaults() {
        let json = r#"{"photoset":{"id":"721","photo":[{"id":"42","secret":"abc","server":"1"}]}}"#;
        let parsed: PhotosetPhotosResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.photoset.page, 1);
        assert_eq!(parsed.photoset.pages, 1);
        assert_eq!(
            parsed.photoset.photo,
            vec![PhotoRef {
                id: "42".into(),
                secret: "abc".into()
            }]
        );
    }

    #[test]
    fn test_photo_info_metadata() {
        let json = r#"{"photo":{"id":"42","farm":5,"server":"4321","originalsecret":"orig"}}"#;
        let parsed: PhotoInfoResponse = serde_json::from_str(json).unwrap();

        assert_eq!(
            parsed.photo.into_metadata(),
            Some(PhotoMetadata {
                farm_id: 5,
                server_id: "4321".into(),
                original_secret: "orig".into(),
            })
        );
    }

    #[test]
    fn test_photo_info_without_original_secret() {
        let json = r#"{"photo":{"id":"42","farm":"5","server":"4321"}}"#;
        let parsed: PhotoInfoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.photo.into_metadata(), None);
    }

    #[test]
    fn test_token_permissions() {
        let json = r#"{"oauth":{"perms":{"_content":"read"},"user":{"nsid":"1@N0","username":"me"}}}"#;
        let parsed: CheckTokenResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.oauth.allows_read());

        let json = r#"{"oauth":{"perms":{"_content":"none"},"user":{"nsid":"1@N0","username":"me"}}}"#;
        let parsed: CheckTokenResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.oauth.allows_read());
    }
}
