use crate::models::{Category, FileRecord};
use std::collections::BTreeSet;

/// Narrowing applied to a user's file list. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub category: Option<Category>,
    /// Exact tag membership.
    pub tag: Option<String>,
    /// Case-insensitive substring over the file name and tags.
    pub search: Option<String>,
}

impl FileFilter {
    pub fn matches(&self, file: &FileRecord) -> bool {
        if let Some(category) = self.category {
            if file.category != category {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !file.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                file.file_name.to_lowercase().contains(&needle)
                    || file.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }

    pub fn apply<'a>(&self, files: &'a [FileRecord]) -> Vec<&'a FileRecord> {
        files.iter().filter(|f| self.matches(f)).collect()
    }
}

/// Distinct categories present in `files`, in label order.
pub fn present_categories(files: &[FileRecord]) -> Vec<Category> {
    let labels: BTreeSet<&str> = files.iter().map(|f| f.category.label()).collect();
    labels.into_iter().filter_map(Category::from_label).collect()
}
