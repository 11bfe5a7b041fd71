//! Provider abstractions for inference models and object storage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod gemini;
pub mod inference;
pub mod noop;
pub mod openai;
pub mod s3;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("{0} is not set in environment variables.")]
    MissingApiKey(&'static str),
    #[error("object fetch failed: {0}")]
    Fetch(String),
    #[error("{0} returned an empty response.")]
    EmptyResponse(String),
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("malformed response: expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// One piece of a user turn sent to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    InlineData { mime_type: String, data: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        ContentPart::InlineData {
            mime_type: mime_type.into(),
            data: base64_data.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub parts: Vec<ContentPart>,
}

/// Raw text returned by a model.
///
/// `text` is the provider's aggregated answer; `candidate_parts` holds the
/// text of each part of the first candidate and is consulted only when
/// `text` is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub candidate_parts: Vec<String>,
}

#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Registry key.
    fn name(&self) -> &str;
    /// Name used in user-facing diagnostics.
    fn display_name(&self) -> &str {
        self.name()
    }
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    llms: HashMap<String, Arc<dyn LlmProvider>>,
    pub preferred_llm: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_llm(mut self, name: &str, provider: Arc<dyn LlmProvider>) -> Self {
        self.llms.insert(name.to_string(), provider);
        self
    }

    pub fn set_preferred_llm(mut self, name: &str) -> Self {
        self.preferred_llm = Some(name.to_string());
        self
    }

    pub fn llm(&self, name: Option<&str>) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let key = name
            .map(str::to_string)
            .or_else(|| self.preferred_llm.clone())
            .ok_or_else(|| ProviderError::UnknownProvider("no llm provider configured".into()))?;
        self.llms
            .get(&key)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownProvider(key))
    }
}
