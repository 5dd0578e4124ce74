mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod sheets;
mod state;
mod twilio;
mod webhook;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::pipeline::Extractor;
use crate::routes::build_router;
use crate::sheets::{SheetSink, SheetsClient};
use crate::state::AppState;
use crate::twilio::TwilioClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting WhatsApp resume intake v{}", env!("CARGO_PKG_VERSION"));

    // Initialize extraction pipeline
    let extractor = Extractor::new(&config.extraction())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize Twilio (media download + replies)
    let twilio = Arc::new(TwilioClient::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_whatsapp_number.clone(),
    ));
    info!("Twilio client initialized");

    // Initialize Google Sheets and make sure the header row exists
    let sheets = Arc::new(SheetsClient::new(
        config.google_sheets_id.clone(),
        config.google_sheet_name.clone(),
        config.google_sheets_access_token.clone(),
    ));
    if let Err(e) = sheets.initialize().await {
        warn!("Could not initialize sheet '{}': {e}", config.google_sheet_name);
    }

    // Build app state
    let state = AppState {
        extractor,
        media: twilio.clone(),
        messenger: twilio,
        sheets,
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
