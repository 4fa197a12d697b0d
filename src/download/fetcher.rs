//! Per-photo metadata lookup and streaming download.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::{FlickrApi, PhotoMetadata, PhotoRef};
use crate::error::{Error, Result};
use crate::fs::{partial_path, photo_path};

/// Canonical URL of a photo's original file.
pub fn create_photo_url(
    farm_id: u64,
    server_id: &str,
    photo_id: &str,
    original_secret: &str,
) -> String {
    format!(
        "https://farm{}.staticflickr.com/{}/{}_{}_o.jpg",
        farm_id, server_id, photo_id, original_secret
    )
}

/// Download URL for the photo, honouring a content host override.
fn content_url(api: &FlickrApi, photo_id: &str, metadata: &PhotoMetadata) -> String {
    match &api.endpoints().content {
        Some(base) => format!(
            "{}/farm{}/{}/{}_{}_o.jpg",
            base.trim_end_matches('/'),
            metadata.farm_id,
            metadata.server_id,
            photo_id,
            metadata.original_secret
        ),
        None => create_photo_url(
            metadata.farm_id,
            &metadata.server_id,
            photo_id,
            &metadata.original_secret,
        ),
    }
}

/// Look up where the original of a photo is hosted.
pub async fn resolve_metadata(api: &FlickrApi, photo: &PhotoRef) -> Result<PhotoMetadata> {
    let info = api
        .photo_info(&photo.id, &photo.secret)
        .await
        .map_err(|e| Error::Metadata {
            photo_id: photo.id.clone(),
            reason: e.to_string(),
        })?;

    info.into_metadata().ok_or_else(|| Error::Metadata {
        photo_id: photo.id.clone(),
        reason: "response has no originalsecret".to_string(),
    })
}

/// Resolve, download, and save one photo as `img_{id}.jpg` under `directory`.
///
/// Does not touch the manifest; recording the id is the caller's job.
pub async fn fetch_and_save(
    api: &FlickrApi,
    directory: &Path,
    photo: &PhotoRef,
) -> Result<PathBuf> {
    let metadata = resolve_metadata(api, photo).await?;
    let url = content_url(api, &photo.id, &metadata);
    tracing::debug!("Fetching photo {} from {}", photo.id, url);

    let response = api.download(&photo.id, &url).await?;

    let part_path = partial_path(directory, &photo.id);
    let output_path = photo_path(directory, &photo.id);

    if let Err(e) = stream_to_file(response, &part_path).await {
        // Best effort: the part file is overwritten next time anyway.
        let _ = tokio::fs::remove_file(&part_path).await;
        return Err(Error::Fetch {
            photo_id: photo.id.clone(),
            reason: e.to_string(),
        });
    }

    tokio::fs::rename(&part_path, &output_path)
        .await
        .map_err(|e| Error::Fetch {
            photo_id: photo.id.clone(),
            reason: format!("rename failed: {}", e),
        })?;

    Ok(output_path)
}

/// Stream a response body to disk chunk by chunk.
async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<u64> {
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoints;
    use crate::config::Credentials;

    fn metadata() -> PhotoMetadata {
        PhotoMetadata {
            farm_id: 5,
            server_id: "4321".into(),
            original_secret: "0a1b2c".into(),
        }
    }

    fn api(endpoints: Endpoints) -> FlickrApi {
        let credentials = Credentials {
            api_key: "key".into(),
            api_secret: "secret".into(),
        };
        FlickrApi::new(credentials, endpoints).unwrap()
    }

    #[test]
    fn test_content_url_uses_canonical_host() {
        assert_eq!(
            content_url(&api(Endpoints::default()), "42", &metadata()),
            "https://farm5.staticflickr.com/4321/42_0a1b2c_o.jpg"
        );
    }

    #[test]
    fn test_content_url_override_keeps_farm() {
        let api = api(Endpoints::local("http://127.0.0.1:9000"));
        assert_eq!(
            content_url(&api, "42", &metadata()),
            "http://127.0.0.1:9000/content/farm5/4321/42_0a1b2c_o.jpg"
        );
    }

    #[test]
    fn test_create_photo_url() {
        assert_eq!(
            create_photo_url(5, "4321", "42", "0a1b2c"),
            "https://farm5.staticflickr.com/4321/42_0a1b2c_o.jpg"
        );
    }
}
