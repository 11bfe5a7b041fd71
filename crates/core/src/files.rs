//! Upload bookkeeping and deletion of stored files.

use crate::mime;
use crate::models::FileRecord;
use crate::objectstore::ObjectStore;
use crate::store::{SqliteFileStore, StoreError};
use providers::s3;
use providers::ProviderError;
use storage::models::NewFile;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("File not found")]
    NotFound,
    #[error("Invalid file URL")]
    InvalidUrl,
    #[error("Could not delete file: {0}")]
    Object(#[from] ProviderError),
    #[error("Could not delete file: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub owner_id: i64,
    pub file_name: String,
    pub file_url: String,
    /// Resolved from the file name when absent.
    pub mime_type: Option<String>,
    pub file_size: i64,
}

/// Records a freshly uploaded object as an `Uncategorized` file with no tags.
pub async fn register_upload(store: &SqliteFileStore, upload: Upload) -> Result<FileRecord, StoreError> {
    let mime_type = upload
        .mime_type
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| mime::resolve(&upload.file_name).to_string());
    let new = NewFile {
        user_id: upload.owner_id,
        file_url: strip_query(&upload.file_url).to_string(),
        file_name: upload.file_name,
        mime_type: Some(mime_type),
        file_size: upload.file_size,
    };
    let id = store.insert(&new).await?;
    store.get(id).await?.ok_or(StoreError::NotFound(id))
}

/// Removes the stored object, then the record.
pub async fn delete_file(
    store: &SqliteFileStore,
    objects: &dyn ObjectStore,
    id: i64,
) -> Result<(), DeleteError> {
    let file = store.get(id).await?.ok_or(DeleteError::NotFound)?;
    let key = s3::key_from_url(&file.file_url).ok_or(DeleteError::InvalidUrl)?;
    objects.delete(&key).await?;
    store.delete(id).await?;
    info!(file_id = id, key = %key, "file deleted");
    Ok(())
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
