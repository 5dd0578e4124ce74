/// LLM Client: the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through `ModelInvoker`.
///
/// Model: gemini-2.0-flash-exp (hardcoded: it is the multimodal model the prompts are tuned for)
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for every extraction call.
pub const MODEL: &str = "gemini-2.0-flash-exp";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// An attachment sent to the model alongside the instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineMedia {
    pub mime_type: String,
    pub data: Bytes,
}

/// Everything the model receives for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub text: String,
    pub media: Option<InlineMedia>,
}

/// Seam between the extraction pipeline and the provider. Any failure is
/// terminal for the request: implementations must not retry.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn generate(&self, payload: &PromptPayload) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_tokens: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub output_tokens: u32,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Credentials the extraction pipeline needs. Passed in explicitly so tests
/// never touch the process environment.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub provider_api_key: String,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ExtractionConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key: config.provider_api_key.clone(),
        })
    }

    /// Makes a single call to the Gemini API, returning the full response object.
    pub async fn call(&self, payload: &PromptPayload) -> Result<GenerateResponse, LlmError> {
        let encoded = payload.media.as_ref().map(|m| InlineData {
            mime_type: &m.mime_type,
            data: STANDARD.encode(&m.data),
        });
        let request_body = build_request(&payload.text, encoded);

        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GenerateResponse = response.json().await?;

        if let Some(usage) = &gemini_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_tokens, usage.output_tokens
            );
        }

        Ok(gemini_response)
    }
}

#[async_trait]
impl ModelInvoker for GeminiClient {
    async fn generate(&self, payload: &PromptPayload) -> Result<String, LlmError> {
        let response = self.call(payload).await?;
        response.text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            debug!("Gemini returned no text (finish_reason={reason})");
            LlmError::EmptyContent
        })
    }
}

fn build_request<'a>(text: &'a str, media: Option<InlineData<'a>>) -> GenerateRequest<'a> {
    let mut parts = vec![Part::Text { text }];
    if let Some(inline_data) = media {
        parts.push(Part::Inline { inline_data });
    }
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
    }
}
