//! User-facing WhatsApp replies.

use crate::models::resume::PLACEHOLDER;

pub const EXTRACTION_FAILED: &str =
    "❌ Sorry, couldn't extract resume data. Please send a clear resume or text with your details.";

/// What the sender hears back after their message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A record was produced and stored.
    Confirmation { name: String },
    /// No record could be produced.
    ExtractionFailed,
    /// Something else went wrong while handling the message.
    ProcessingError(String),
}

impl Reply {
    pub fn message(&self) -> String {
        match self {
            Reply::Confirmation { name } => {
                // Fallback records have no usable name.
                let name = if name.is_empty() || name == PLACEHOLDER {
                    "there"
                } else {
                    name.as_str()
                };
                format!(
                    "Thank you {name} for sending your resume! 🎉\n\n\
                     We have received your application and will review it shortly."
                )
            }
            Reply::ExtractionFailed => EXTRACTION_FAILED.to_string(),
            Reply::ProcessingError(reason) => format!("❌ Error processing your request: {reason}"),
        }
    }
}
