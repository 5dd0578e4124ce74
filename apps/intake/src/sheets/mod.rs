//! Google Sheets sink: appends one row per processed resume.
//!
//! Column layout (A–K):
//! Timestamp | Name | Email | Phone | LinkedIn | Skills | Experience |
//! Education | Summary | WhatsApp Number | Status

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::resume::ResumeRecord;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const STATUS_PROCESSED: &str = "Processed";

pub const HEADERS: [&str; 11] = [
    "Timestamp",
    "Name",
    "Email",
    "Phone",
    "LinkedIn",
    "Skills",
    "Experience",
    "Education",
    "Summary",
    "WhatsApp Number",
    "Status",
];

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid spreadsheet URL")]
    InvalidUrl,
}

/// One spreadsheet row in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow(pub Vec<String>);

impl SheetRow {
    pub fn new(record: &ResumeRecord, sender: &str, timestamp: NaiveDateTime) -> Self {
        Self(vec![
            timestamp.format(TIMESTAMP_FORMAT).to_string(),
            record.name.clone(),
            record.email.clone(),
            record.phone.clone(),
            record.linkedin.clone(),
            record.skills_joined(),
            record.experience.clone(),
            record.education.clone(),
            record.summary.clone(),
            sender.to_string(),
            STATUS_PROCESSED.to_string(),
        ])
    }
}

/// Durable storage for processed resumes.
#[async_trait]
pub trait SheetSink: Send + Sync {
    /// Writes the header row if the sheet has none. Returns true if it wrote one.
    async fn initialize(&self) -> Result<bool, SheetsError>;

    async fn append(&self, row: &SheetRow) -> Result<(), SheetsError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
struct AppendUpdates {
    #[serde(rename = "updatedCells", default)]
    updated_cells: u32,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

/// Sheets v4 REST client using a pre-issued OAuth access token.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    spreadsheet_id: String,
    sheet_name: String,
    access_token: String,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: String, sheet_name: String, access_token: String) -> Self {
        Self {
            client: Client::new(),
            spreadsheet_id,
            sheet_name,
            access_token,
        }
    }

    fn values_url(&self, cells: &str, suffix: &str) -> Result<Url, SheetsError> {
        let mut url = Url::parse(SHEETS_API_BASE).map_err(|_| SheetsError::InvalidUrl)?;
        let range = a1_range(&self.sheet_name, cells);
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl)?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GoogleError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(SheetsError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SheetSink for SheetsClient {
    async fn initialize(&self) -> Result<bool, SheetsError> {
        let url = self.values_url("A1:K1", "")?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let existing: ValueRange = Self::check(response).await?.json().await?;

        if !existing.values.is_empty() {
            debug!("Sheet '{}' already has headers", self.sheet_name);
            return Ok(false);
        }

        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [HEADERS] }))
            .send()
            .await?;
        Self::check(response).await?;

        info!("Headers created in sheet '{}'", self.sheet_name);
        Ok(true)
    }

    async fn append(&self, row: &SheetRow) -> Result<(), SheetsError> {
        let url = self.values_url("A:K", ":append")?;
        let response = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [row.0] }))
            .send()
            .await?;
        let appended: AppendResponse = Self::check(response).await?.json().await?;

        let cells = appended.updates.map(|u| u.updated_cells).unwrap_or_default();
        info!("Row appended to sheet '{}': {cells} cells updated", self.sheet_name);
        Ok(())
    }
}

/// A1 notation for `cells` on `sheet`, quoting sheet names that need it.
fn a1_range(sheet: &str, cells: &str) -> String {
    if sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("{sheet}!{cells}")
    } else {
        format!("'{}'!{cells}", sheet.replace('\'', "''"))
    }
}
