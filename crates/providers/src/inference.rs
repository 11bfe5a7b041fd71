//! Single-shot structured inference: one model call, fence stripping, JSON parsing.
//!
//! No retries happen here; a failed call is terminal for that invocation.

use crate::{GenerateRequest, LlmProvider, ProviderError};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct InferenceClient {
    provider: Arc<dyn LlmProvider>,
}

impl InferenceClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The answer must be a JSON object; any other JSON value is malformed.
    pub async fn infer(&self, request: &GenerateRequest) -> Result<Map<String, Value>, ProviderError> {
        let resp = self.provider.generate(request).await?;
        let raw = resp
            .text
            .or_else(|| resp.candidate_parts.into_iter().next())
            .unwrap_or_default();

        let text = strip_code_fence(&raw);
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse(
                self.provider.display_name().to_string(),
            ));
        }
        debug!(provider = self.provider.name(), len = text.len(), "model answered");
        match serde_json::from_str(text)? {
            Value::Object(map) => Ok(map),
            other => Err(ProviderError::NotAnObject(json_kind(&other))),
        }
    }
}

/// Trims the text and removes a surrounding markdown code fence, if any.
///
/// A leading fence may carry a lowercase language tag and a newline.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_lowercase());
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
