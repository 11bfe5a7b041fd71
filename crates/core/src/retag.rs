use crate::classifier::{ClassifyRequest, Classifier};
use crate::mime;
use crate::models::{BatchRetagSummary, Category, RetagOutcome};
use crate::store::FileStore;
use std::sync::Arc;
use tracing::{info, warn};

pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Re-classifies every file of one owner.
///
/// Files are processed one after another, never concurrently, which keeps at
/// most one inference call in flight per run.
pub struct Retagger {
    classifier: Arc<Classifier>,
    store: Arc<dyn FileStore>,
}

impl Retagger {
    pub fn new(classifier: Arc<Classifier>, store: Arc<dyn FileStore>) -> Self {
        Self { classifier, store }
    }

    /// `user_id` is the raw identity from the caller's session.
    pub async fn retag_all(&self, user_id: Option<&str>) -> RetagOutcome {
        let Some(owner_id) = resolve_owner(user_id) else {
            return RetagOutcome::Failure(NOT_AUTHENTICATED.to_string());
        };

        let files = match self.store.list_files(owner_id).await {
            Ok(files) => files,
            Err(err) => {
                warn!(owner_id, error = %err, "could not list files for retag");
                return RetagOutcome::Failure(format!("Could not list files: {err}"));
            }
        };

        info!(owner_id, total = files.len(), "retag started");
        let mut summary = BatchRetagSummary {
            total: files.len(),
            ..Default::default()
        };

        for file in files {
            let req = ClassifyRequest {
                file_id: file.id,
                mime_type: mime::resolve(&file.file_name).to_string(),
                file_url: file.file_url,
                file_name: file.file_name,
            };
            let result = self.classifier.classify_and_persist(&req).await;
            if result.category != Category::Uncategorized {
                summary.tagged += 1;
            }
            if summary.first_error.is_none() {
                summary.first_error = result.error;
            }
        }

        info!(
            owner_id,
            tagged = summary.tagged,
            total = summary.total,
            failed = summary.first_error.is_some(),
            "retag finished"
        );
        RetagOutcome::Success(summary)
    }
}

/// Session ids are positive integers; anything else is unauthenticated.
fn resolve_owner(user_id: Option<&str>) -> Option<i64> {
    user_id
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}
