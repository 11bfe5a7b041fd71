//! Single-file classification: rules, then image or document inference, then
//! a best-effort write of the outcome.
//!
//! `classify_and_persist` is total. Every failure ends up in
//! `ClassificationResult::error`, and the record is always left with a valid
//! category (`Uncategorized` with no tags at worst), so callers may spawn it
//! and never look at the result.

use crate::mime;
use crate::models::{Category, ClassificationResult};
use crate::objectstore::ContentFetcher;
use crate::prompts;
use crate::rules::RuleClassifier;
use crate::store::FileStore;
use providers::inference::InferenceClient;
use providers::ProviderError;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub const MAX_TAGS: usize = 5;

#[derive(Debug, Clone)]
pub struct ClassifyRequest {
    pub file_id: i64,
    /// Bare storage URL; a query string, if present, is ignored.
    pub file_url: String,
    pub mime_type: String,
    pub file_name: String,
}

/// Category plus tags as the model (or a rule) produced them, before normalization.
struct Draft {
    category: Category,
    tags: Value,
}

pub struct Classifier {
    rules: RuleClassifier,
    inference: InferenceClient,
    fetcher: Arc<dyn ContentFetcher>,
    store: Arc<dyn FileStore>,
}

impl Classifier {
    pub fn new(
        inference: InferenceClient,
        fetcher: Arc<dyn ContentFetcher>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            rules: RuleClassifier::default(),
            inference,
            fetcher,
            store,
        }
    }

    pub async fn classify_and_persist(&self, req: &ClassifyRequest) -> ClassificationResult {
        let mut result = match self.classify(req).await {
            Ok(draft) => ClassificationResult {
                category: draft.category,
                tags: normalize_tags(&draft.tags),
                error: None,
            },
            Err(err) => {
                warn!(
                    file_id = req.file_id,
                    file_name = %req.file_name,
                    error = %err,
                    "classification failed"
                );
                ClassificationResult::failed(err.to_string())
            }
        };

        if let Err(err) = self
            .store
            .update_classification(req.file_id, result.category, &result.tags)
            .await
        {
            error!(file_id = req.file_id, error = %err, "classification write failed");
            if result.error.is_none() {
                result.error = Some(format!("DB: {err}"));
            }
        }

        info!(
            file_id = req.file_id,
            category = %result.category,
            tags = result.tags.len(),
            ok = result.error.is_none(),
            "file classified"
        );
        result
    }

    /// Runs `classify_and_persist` on the runtime. Dropping the handle does
    /// not cancel the work.
    pub fn spawn(self: &Arc<Self>, req: ClassifyRequest) -> JoinHandle<ClassificationResult> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.classify_and_persist(&req).await })
    }

    async fn classify(&self, req: &ClassifyRequest) -> Result<Draft, ProviderError> {
        if let Some(ruled) = self.rules.classify(&req.mime_type) {
            return Ok(Draft {
                category: ruled.category,
                tags: Value::from(ruled.tags),
            });
        }

        if mime::is_image(&req.mime_type) {
            let data = self.fetcher.fetch_base64(&req.file_url).await?;
            let answer = self
                .inference
                .infer(&prompts::image_request(&req.mime_type, data))
                .await?;
            let category = answer
                .get("category")
                .and_then(Value::as_str)
                .and_then(Category::from_label)
                .unwrap_or(Category::Uncategorized);
            return Ok(Draft {
                category,
                tags: answer.get("tags").cloned().unwrap_or(Value::Null),
            });
        }

        if let Some(category) = document_category(&req.mime_type) {
            let answer = self
                .inference
                .infer(&prompts::document_request(&req.file_name, &req.mime_type))
                .await?;
            // The model's own pick between Documents and PDFs is discarded.
            return Ok(Draft {
                category,
                tags: answer.get("tags").cloned().unwrap_or(Value::Null),
            });
        }

        Ok(Draft {
            category: Category::Documents,
            tags: Value::from(vec!["file"]),
        })
    }
}

/// Category forced for document MIME types, `None` for everything else.
fn document_category(mime_type: &str) -> Option<Category> {
    match mime_type {
        mime::PDF => Some(Category::Pdfs),
        mime::MSWORD | mime::DOCX => Some(Category::Documents),
        _ => None,
    }
}

/// Non-arrays become empty; elements are stringified and the list cut to
/// `MAX_TAGS`. Duplicates are kept.
pub fn normalize_tags(tags: &Value) -> Vec<String> {
    let Value::Array(items) = tags else {
        return Vec::new();
    };
    items
        .iter()
        .take(MAX_TAGS)
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}
