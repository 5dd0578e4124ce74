use anyhow::{Context, Result};

use crate::llm_client::ExtractionConfig;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_whatsapp_number: String,
    pub google_sheets_id: String,
    pub google_sheets_access_token: String,
    pub google_sheet_name: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            twilio_account_sid: require_env("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: require_env("TWILIO_AUTH_TOKEN")?,
            twilio_whatsapp_number: require_env("TWILIO_WHATSAPP_NUMBER")?,
            google_sheets_id: require_env("GOOGLE_SHEETS_ID")?,
            google_sheets_access_token: require_env("GOOGLE_SHEETS_ACCESS_TOKEN")?,
            google_sheet_name: std::env::var("GOOGLE_SHEET_NAME")
                .unwrap_or_else(|_| "Resumes".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The subset of configuration the extraction pipeline needs.
    pub fn extraction(&self) -> ExtractionConfig {
        ExtractionConfig {
            provider_api_key: self.gemini_api_key.clone(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
