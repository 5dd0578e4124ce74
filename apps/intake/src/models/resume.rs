use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Placeholder stored in every scalar field the model could not fill.
pub const PLACEHOLDER: &str = "N/A";

/// One inbound message, ready for extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionRequest {
    pub text: Option<String>,
    pub media: Option<Bytes>,
    /// MIME type reported by the messaging provider for `media`.
    pub media_type: Option<String>,
}

impl ExtractionRequest {
    pub fn new(text: Option<String>, media: Option<Bytes>, media_type: Option<String>) -> Self {
        Self {
            text: text.filter(|t| !t.is_empty()),
            media: media.filter(|m| !m.is_empty()),
            media_type: media_type.filter(|t| !t.trim().is_empty()),
        }
    }

    #[cfg(test)]
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(Some(text.into()), None, None)
    }

    pub fn has_media(&self) -> bool {
        self.media.as_ref().is_some_and(|m| !m.is_empty())
    }
}

/// Normalized extraction result. Every key is always present: scalars hold
/// `"N/A"` when unknown, `skills` is empty when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub summary: String,
}

impl ResumeRecord {
    /// The record returned when the model output could not be decoded.
    pub fn fallback(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Skills as a single cell value.
    pub fn skills_joined(&self) -> String {
        self.skills.join(", ")
    }
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self {
            name: PLACEHOLDER.to_string(),
            email: PLACEHOLDER.to_string(),
            phone: PLACEHOLDER.to_string(),
            linkedin: PLACEHOLDER.to_string(),
            skills: Vec::new(),
            experience: PLACEHOLDER.to_string(),
            education: PLACEHOLDER.to_string(),
            summary: PLACEHOLDER.to_string(),
        }
    }
}
