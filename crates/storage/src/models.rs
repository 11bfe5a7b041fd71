use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FileRow {
    pub id: i64,
    pub user_id: i64,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub file_size: i64,
    pub category: String,
    /// JSON array of strings.
    pub tags: String,
    pub created_at: i64,
}

impl FileRow {
    pub fn tag_list(&self) -> Vec<String> {
        serde_json::from_str(&self.tags).unwrap_or_default()
    }
}

/// The columns a batch re-tag needs.
#[derive(Debug, Clone, FromRow)]
pub struct FileRef {
    pub id: i64,
    pub file_name: String,
    pub file_url: String,
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub user_id: i64,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub file_size: i64,
}
