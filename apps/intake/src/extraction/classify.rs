//! Input classifier: decides which extraction path a message takes.

use crate::models::resume::ExtractionRequest;

const IMAGE_MARKER: &str = "image";
const PDF_MARKER: &str = "pdf";
const WORD_MARKERS: &[&str] = &["wordprocessingml", "msword", "docx"];

/// Extraction strategy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Sent to the model as inline image data.
    Image,
    /// Sent to the model as an inline PDF.
    Pdf,
    /// Converted to plain text locally, then sent as text.
    WordDocument,
    /// Unsupported attachment. The media is dropped and only the text is used.
    OtherBinary,
    TextOnly,
}

impl PathKind {
    /// Resolves the path for a whole request. Without media bytes (none sent,
    /// or the download failed) the MIME type is irrelevant.
    pub fn for_request(request: &ExtractionRequest) -> Self {
        if !request.has_media() {
            return PathKind::TextOnly;
        }
        classify(request.media_type.as_deref())
    }

    /// True when the model receives the attachment itself rather than text.
    pub fn is_multimodal(self) -> bool {
        matches!(self, PathKind::Image | PathKind::Pdf)
    }
}

/// Maps a MIME type onto a `PathKind`. Never fails: unknown types become
/// `OtherBinary`, which downstream behaves exactly like `TextOnly`.
pub fn classify(media_type: Option<&str>) -> PathKind {
    let media_type = match media_type.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_ascii_lowercase(),
        _ => return PathKind::TextOnly,
    };

    if media_type.contains(IMAGE_MARKER) {
        PathKind::Image
    } else if media_type.contains(PDF_MARKER) {
        PathKind::Pdf
    } else if WORD_MARKERS.iter().any(|m| media_type.contains(m)) {
        PathKind::WordDocument
    } else {
        PathKind::OtherBinary
    }
}
