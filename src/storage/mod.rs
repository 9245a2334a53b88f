use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("invalid storage URL: {0}")]
    BadUrl(String),
}

/// Object listed from the bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Thin client for the hosted object storage HTTP API. The uploads
/// endpoints are a proxy over this; no transformation happens here.
pub struct StorageClient {
    base_url: String,
    bucket: String,
    service_key: String,
    client: reqwest::Client,
}

impl StorageClient {
    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            bucket: cfg.bucket.clone(),
            service_key: cfg.service_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn bucket_url(&self, prefix: &[&str]) -> Result<Url, StorageError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| StorageError::BadUrl(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StorageError::BadUrl("base URL cannot carry a path".to_string()))?;
            segments.pop_if_empty();
            segments.extend(prefix);
            segments.push(&self.bucket);
        }
        Ok(url)
    }

    /// URL for one object. `path` is a caller-supplied bucket path whose
    /// segments may hold spaces or reserved characters; each segment is
    /// percent-encoded, slashes keep their meaning.
    fn object_url(&self, prefix: &[&str], path: &str) -> Result<String, StorageError> {
        let mut url = self.bucket_url(prefix)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StorageError::BadUrl("base URL cannot carry a path".to_string()))?;
            segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        Ok(url.into())
    }

    /// Upload bytes under `path`, returning the public URL
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .client
            .post(self.object_url(&["storage", "v1", "object"], path)?)
            .bearer_auth(&self.service_key)
            .header("content-type", content_type.to_string())
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        self.object_url(&["storage", "v1", "object", "public"], path)
    }

    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.object_url(&["storage", "v1", "object"], path)?)
            .bearer_auth(&self.service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }
        Ok(())
    }

    pub async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let url: String = self.bucket_url(&["storage", "v1", "object", "list"])?.into();
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.service_key)
            .json(&serde_json::json!({ "prefix": prefix }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream(response).await);
        }

        Ok(response.json().await?)
    }
}

async fn upstream(response: reqwest::Response) -> StorageError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StorageError::Upstream { status, body }
}
