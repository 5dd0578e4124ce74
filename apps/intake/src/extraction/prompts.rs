// Resume extraction prompt template and payload assembly.

use bytes::Bytes;

use crate::extraction::classify::PathKind;
use crate::llm_client::{InlineMedia, PromptPayload};

const PDF_MIME_TYPE: &str = "application/pdf";

pub const RESUME_EXTRACTION_PROMPT: &str = r#"You extract candidate details from resumes.
Read the resume or message provided and return a single JSON object with exactly these fields:

{
  "name": "full name of the candidate",
  "email": "email address",
  "phone": "phone or contact number",
  "linkedin": "LinkedIn profile URL",
  "skills": ["skill", "skill"],
  "experience": "years of experience or most recent role",
  "education": "highest degree or institution",
  "summary": "one-line summary of the candidate"
}

RULES:
1. "skills" is always an array of strings.
2. If a field cannot be found, use "N/A" for strings and [] for "skills".
3. Keep phone numbers in the format they were written.
4. The input may be a PDF, an image, a Word document or a plain chat message.
5. Return ONLY the JSON object: no prose, no markdown, no code fences."#;

/// Label separating the instructions from the candidate's text.
pub const RESUME_CONTENT_LABEL: &str = "Resume Content:";

/// Builds the model input for one request.
///
/// Image and PDF paths ship the attachment itself; every other path sends the
/// instructions followed by `text` (normalized document text or the message).
pub fn build_prompt(
    kind: PathKind,
    text: &str,
    media: Option<&Bytes>,
    media_type: Option<&str>,
) -> PromptPayload {
    let inline = match (kind, media) {
        (PathKind::Image, Some(data)) => Some(InlineMedia {
            mime_type: media_type.unwrap_or("image/jpeg").to_string(),
            data: data.clone(),
        }),
        (PathKind::Pdf, Some(data)) => Some(InlineMedia {
            mime_type: PDF_MIME_TYPE.to_string(),
            data: data.clone(),
        }),
        _ => None,
    };

    match inline {
        Some(media) => PromptPayload {
            text: RESUME_EXTRACTION_PROMPT.to_string(),
            media: Some(media),
        },
        None => PromptPayload {
            text: format!("{RESUME_EXTRACTION_PROMPT}\n\n{RESUME_CONTENT_LABEL}\n{text}"),
            media: None,
        },
    }
}
