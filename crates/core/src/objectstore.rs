use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use providers::s3::{self, S3Client};
use providers::ProviderError;

/// Pulls stored object bytes for multimodal inference.
#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Base64 of the object behind `file_url`.
    async fn fetch_base64(&self, file_url: &str) -> Result<String, ProviderError>;
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    async fn delete(&self, key: &str) -> Result<(), ProviderError>;
}

pub struct S3ObjectStore {
    client: S3Client,
    presign_expiry_secs: u64,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, presign_expiry_secs: u64) -> Self {
        Self {
            client,
            presign_expiry_secs,
        }
    }
}

#[async_trait::async_trait]
impl ContentFetcher for S3ObjectStore {
    async fn fetch_base64(&self, file_url: &str) -> Result<String, ProviderError> {
        let key = s3::key_from_url(file_url)
            .ok_or_else(|| ProviderError::Fetch(format!("no object key in {file_url}")))?;
        let bytes = self.client.get_object(&key, self.presign_expiry_secs).await?;
        Ok(STANDARD.encode(&bytes))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn delete(&self, key: &str) -> Result<(), ProviderError> {
        self.client.delete_object(key, self.presign_expiry_secs).await
    }
}

/// Stand-in when no bucket is configured; every call fails.
pub struct NoopObjectStore;

#[async_trait::async_trait]
impl ContentFetcher for NoopObjectStore {
    async fn fetch_base64(&self, _file_url: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Fetch("object storage is not configured".into()))
    }
}

#[async_trait::async_trait]
impl ObjectStore for NoopObjectStore {
    async fn delete(&self, _key: &str) -> Result<(), ProviderError> {
        Err(ProviderError::RequestFailed(
            "object storage is not configured".into(),
        ))
    }
}
