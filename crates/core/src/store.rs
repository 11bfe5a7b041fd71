//! Persistence seam between the pipeline and the database.

use crate::models::{Category, FileRecord};
use sqlx::SqlitePool;
use storage::files;
use storage::models::{FileRef, NewFile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    /// Fails with `StoreError::NotFound` when no row has this id.
    async fn update_classification(
        &self,
        id: i64,
        category: Category,
        tags: &[String],
    ) -> Result<(), StoreError>;

    /// Owner's files in listing order.
    async fn list_files(&self, owner_id: i64) -> Result<Vec<FileRef>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteFileStore {
    pool: SqlitePool,
}

impl SqliteFileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates an owner; returns its id.
    pub async fn add_user(&self, email: &str) -> Result<i64, StoreError> {
        Ok(files::insert_user(&self.pool, email).await?)
    }

    pub async fn insert(&self, file: &NewFile) -> Result<i64, StoreError> {
        Ok(files::insert_file(&self.pool, file).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<FileRecord>, StoreError> {
        Ok(files::get_file(&self.pool, id).await?.map(FileRecord::from))
    }

    pub async fn records(&self, owner_id: i64) -> Result<Vec<FileRecord>, StoreError> {
        let rows = files::list_files(&self.pool, owner_id).await?;
        Ok(rows.into_iter().map(FileRecord::from).collect())
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        match files::delete_file(&self.pool, id).await? {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl FileStore for SqliteFileStore {
    async fn update_classification(
        &self,
        id: i64,
        category: Category,
        tags: &[String],
    ) -> Result<(), StoreError> {
        match files::update_classification(&self.pool, id, category.label(), tags).await? {
            0 => Err(StoreError::NotFound(id)),
            _ => Ok(()),
        }
    }

    async fn list_files(&self, owner_id: i64) -> Result<Vec<FileRef>, StoreError> {
        Ok(files::list_file_refs(&self.pool, owner_id).await?)
    }
}
