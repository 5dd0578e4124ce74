//! Axum route handler for the Twilio WhatsApp webhook.
//!
//! Flow: download media → extract → append to sheet → reply to sender.
//! The HTTP response only acknowledges the callback; the outcome reaches the
//! sender as a WhatsApp message.

use axum::{extract::State, http::StatusCode, Form};
use chrono::Local;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::resume::ExtractionRequest;
use crate::sheets::SheetRow;
use crate::state::AppState;
use crate::webhook::replies::Reply;

/// Form fields Twilio posts for an inbound message. Only the first
/// attachment is considered.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "MediaUrl0", default)]
    pub media_url: String,
    #[serde(rename = "MediaContentType0", default)]
    pub media_type: String,
}

/// POST /webhook
pub async fn handle_webhook(
    State(state): State<AppState>,
    Form(message): Form<InboundMessage>,
) -> Result<StatusCode, AppError> {
    if message.from.trim().is_empty() {
        return Err(AppError::Validation("From cannot be empty".to_string()));
    }

    info!(
        from = %message.from,
        media_type = %message.media_type,
        has_media = !message.media_url.is_empty(),
        "New WhatsApp message received"
    );

    let reply = match process_message(&state, &message).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Error processing message from {}: {e}", message.from);
            Reply::ProcessingError(e.to_string())
        }
    };

    if let Err(e) = state.messenger.send(&message.from, &reply.message()).await {
        error!("Failed to send reply to {}: {e}", message.from);
    } else {
        info!("Reply sent: {reply:?}");
    }

    Ok(StatusCode::OK)
}

/// Runs one message through extraction and storage and picks the reply.
async fn process_message(state: &AppState, message: &InboundMessage) -> Result<Reply, AppError> {
    let media = if message.media_url.is_empty() {
        None
    } else {
        info!("Downloading media file...");
        state.media.fetch(&message.media_url).await
    };

    let request = ExtractionRequest::new(
        Some(message.body.clone()),
        media,
        Some(message.media_type.clone()),
    );

    let record = match state.extractor.extract(&request).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Resume extraction failed: {e}");
            return Ok(Reply::ExtractionFailed);
        }
    };
    info!(name = %record.name, "Resume data extracted");

    let row = SheetRow::new(&record, &message.from, Local::now().naive_local());
    state.sheets.append(&row).await?;

    Ok(Reply::Confirmation { name: record.name })
}
