use serde::{Deserialize, Serialize};
use std::fmt;
use storage::models::FileRow;

/// Closed set of labels a file can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Category {
    Photos,
    Screenshots,
    #[serde(rename = "Diagrams & Charts")]
    DiagramsAndCharts,
    #[serde(rename = "Artwork & Design")]
    ArtworkAndDesign,
    Documents,
    #[serde(rename = "PDFs")]
    Pdfs,
    Presentations,
    Spreadsheets,
    Videos,
    #[default]
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Photos,
        Category::Screenshots,
        Category::DiagramsAndCharts,
        Category::ArtworkAndDesign,
        Category::Documents,
        Category::Pdfs,
        Category::Presentations,
        Category::Spreadsheets,
        Category::Videos,
        Category::Uncategorized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Photos => "Photos",
            Category::Screenshots => "Screenshots",
            Category::DiagramsAndCharts => "Diagrams & Charts",
            Category::ArtworkAndDesign => "Artwork & Design",
            Category::Documents => "Documents",
            Category::Pdfs => "PDFs",
            Category::Presentations => "Presentations",
            Category::Spreadsheets => "Spreadsheets",
            Category::Videos => "Videos",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub owner_id: i64,
    pub file_name: String,
    #[serde(rename = "fileURL")]
    pub file_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub category: Category,
    pub tags: Vec<String>,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        let tags = row.tag_list();
        let mime_type = row
            .mime_type
            .clone()
            .unwrap_or_else(|| crate::mime::resolve(&row.file_name).to_string());
        FileRecord {
            id: row.id,
            owner_id: row.user_id,
            category: Category::from_label(&row.category).unwrap_or_default(),
            tags,
            mime_type,
            file_size: row.file_size,
            file_name: row.file_name,
            file_url: row.file_url,
        }
    }
}

/// Outcome of one classification run. Only `category` and `tags` are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub tags: Vec<String>,
    pub error: Option<String>,
}

impl ClassificationResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            category: Category::Uncategorized,
            tags: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRetagSummary {
    pub tagged: usize,
    pub total: usize,
    pub first_error: Option<String>,
}

/// Wire shape of a batch run: `{"success": {...}}` or `{"failure": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetagOutcome {
    Success(BatchRetagSummary),
    Failure(String),
}
