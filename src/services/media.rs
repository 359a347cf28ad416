//! External media host client.
//!
//! Uploads go out as multipart POSTs and come back as a JSON asset record;
//! deletions address the asset by the public id embedded in its URL. The
//! trait seam exists so handlers can be exercised against a mock host.
use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;

use crate::config::MediaConfig;
use crate::error::{AppError, Result};

/// Asset record returned by the media host after an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    /// Playback length in seconds; absent for images.
    pub duration: Option<f64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<MediaAsset>;
    async fn delete(&self, url: &str) -> Result<()>;
}

pub struct HttpMediaStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpMediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

/// Last path segment of an asset URL, minus extension and query/fragment.
fn public_id_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let segment = path.rsplit('/').next()?;
    let id = segment.split('.').next()?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<MediaAsset> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("media upload failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "media host rejected upload: {}",
                response.status()
            )));
        }

        response
            .json::<MediaAsset>()
            .await
            .map_err(|e| AppError::Upstream(format!("malformed media host response: {e}")))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let public_id = public_id_from_url(url)
            .ok_or_else(|| AppError::Upstream(format!("asset URL has no public id: {url}")))?;

        let response = self
            .client
            .delete(format!("{}/assets/{}", self.base_url, public_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("media delete failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "media host rejected delete: {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Upload a replacement asset, persist its URL, then delete the previous
/// asset. The new asset is durable before the old one is touched, and a
/// failed delete only logs: the record already points at the new URL, so an
/// orphaned old asset is preferable to a broken reference.
pub async fn swap_media<F, Fut>(
    store: &dyn MediaStore,
    filename: &str,
    bytes: Vec<u8>,
    previous_url: Option<&str>,
    persist: F,
) -> Result<String>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let asset = store.upload(filename, bytes).await?;
    persist(asset.url.clone()).await?;

    if let Some(old) = previous_url {
        if let Err(err) = store.delete(old).await {
            tracing::warn!(url = old, error = %err, "failed to delete replaced media asset");
        }
    }

    Ok(asset.url)
}
