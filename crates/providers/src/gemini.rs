use crate::{ContentPart, GenerateRequest, GenerateResponse, LlmProvider, ProviderError};
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_VAR: &str = "GOOGLE_GEMINI_API_KEY";

#[derive(Clone)]
pub struct GeminiConfig {
    /// Checked on every call rather than at construction.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    cfg: Arc<GeminiConfig>,
}

impl GeminiProvider {
    pub fn new(cfg: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

fn to_parts(request: &GenerateRequest) -> Vec<Part<'_>> {
    request
        .parts
        .iter()
        .map(|p| match p {
            ContentPart::Text { text } => Part::Text { text },
            ContentPart::InlineData { mime_type, data } => Part::Inline {
                inline_data: InlineData { mime_type, data },
            },
        })
        .collect()
}

fn into_response(parsed: GenerateContentResponse) -> GenerateResponse {
    let parts: Vec<CandidatePart> = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    // Aggregate answer skips reasoning parts, the raw list keeps them.
    let answer: Vec<&str> = parts
        .iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text.as_deref())
        .collect();
    let text = if answer.is_empty() {
        None
    } else {
        Some(answer.concat())
    };

    GenerateResponse {
        text,
        candidate_parts: parts.into_iter().filter_map(|p| p.text).collect(),
    }
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn display_name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let api_key = self
            .cfg
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(API_KEY_VAR))?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: to_parts(request),
            }],
        };

        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.cfg.base_url, self.cfg.model
            ))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
            return Err(ProviderError::RequestFailed(format!(
                "status {} body {:?}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(into_response(parsed))
    }
}
