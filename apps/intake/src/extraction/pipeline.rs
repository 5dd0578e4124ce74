//! Extraction pipeline: orchestrates one request end to end.
//!
//! Flow: classify → (normalize Word document) → build prompt → invoke model →
//!       parse response → `ResumeRecord`.

use std::borrow::Cow;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::classify::PathKind;
use crate::extraction::docx::{normalize, DocumentParseError};
use crate::extraction::parser::parse_response;
use crate::extraction::prompts::build_prompt;
use crate::llm_client::{ExtractionConfig, GeminiClient, LlmError, ModelInvoker};
use crate::models::resume::{ExtractionRequest, ResumeRecord};

/// Reasons a request yields no record at all. A model answer that is not
/// valid JSON is not one of them: it becomes the fallback record.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read the attached document: {0}")]
    DocumentParse(#[from] DocumentParseError),

    #[error("model call failed: {0}")]
    Provider(LlmError),

    #[error("model response had no text")]
    MissingRecord,
}

impl From<LlmError> for ExtractionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => ExtractionError::MissingRecord,
            other => ExtractionError::Provider(other),
        }
    }
}

/// Runs the extraction pipeline against a model provider.
#[derive(Clone)]
pub struct Extractor {
    invoker: Arc<dyn ModelInvoker>,
}

impl Extractor {
    /// Builds an extractor backed by Gemini.
    pub fn new(config: &ExtractionConfig) -> Result<Self, LlmError> {
        Ok(Self::with_invoker(Arc::new(GeminiClient::new(config)?)))
    }

    pub fn with_invoker(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn extract(&self, request: &ExtractionRequest) -> Result<ResumeRecord, ExtractionError> {
        let kind = PathKind::for_request(request);
        info!(multimodal = kind.is_multimodal(), "Extracting resume via {kind:?} path");

        let text = resume_text(kind, request)?;
        let payload = build_prompt(
            kind,
            &text,
            request.media.as_ref(),
            request.media_type.as_deref(),
        );

        let raw = self.invoker.generate(&payload).await?;
        Ok(parse_response(&raw))
    }
}

/// The text that goes under "Resume Content:" for this request.
///
/// Word documents are normalized; if that fails the message text is used
/// instead, and with no message text the request fails.
fn resume_text(kind: PathKind, request: &ExtractionRequest) -> Result<Cow<'_, str>, ExtractionError> {
    let message = request.text.as_deref();

    if kind != PathKind::WordDocument {
        return Ok(Cow::Borrowed(message.unwrap_or_default()));
    }

    let bytes = request.media.as_deref().unwrap_or_default();
    match normalize(bytes) {
        Ok(text) => {
            info!("Extracted {} characters from Word document", text.chars().count());
            Ok(Cow::Owned(text))
        }
        Err(e) => match message {
            Some(text) => {
                warn!("Failed to read Word document, falling back to message text: {e}");
                Ok(Cow::Borrowed(text))
            }
            None => Err(ExtractionError::DocumentParse(e)),
        },
    }
}
