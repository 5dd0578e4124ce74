//! Twilio collaborators: attachment download and WhatsApp replies.
//!
//! Both sit behind traits so the webhook can be exercised without the network.
//! `AppState` carries them as `Arc<dyn MediaFetcher>` / `Arc<dyn ReplySender>`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
const MEDIA_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twilio API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Downloads an inbound attachment. Any failure is reported as `None` so the
/// message degrades to text-only extraction.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<Bytes>;
}

/// Sends a WhatsApp message back to a sender.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), MessagingError>;
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: String,
}

/// Twilio REST client authenticated with the account SID and auth token.
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            client: Client::new(),
            account_sid,
            auth_token,
            from_number,
        }
    }

    fn messages_url(&self) -> String {
        format!("{TWILIO_API_BASE}/Accounts/{}/Messages.json", self.account_sid)
    }

    async fn download(&self, url: &str) -> Result<Option<Bytes>, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .timeout(Duration::from_secs(MEDIA_TIMEOUT_SECS))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            warn!("Media download returned {}", response.status());
            return Ok(None);
        }
        Ok(Some(response.bytes().await?))
    }
}

#[async_trait]
impl MediaFetcher for TwilioClient {
    async fn fetch(&self, url: &str) -> Option<Bytes> {
        match self.download(url).await {
            Ok(Some(bytes)) => {
                debug!("Downloaded {} bytes of media", bytes.len());
                Some(bytes)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Error downloading media: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl ReplySender for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> Result<(), MessagingError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", self.from_number.as_str()), ("To", to), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(MessagingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Reply sent to {to}");
        Ok(())
    }
}
