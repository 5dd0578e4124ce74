//! In-memory collaborators for handler and pipeline tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::extraction::pipeline::Extractor;
use crate::llm_client::{LlmError, ModelInvoker, PromptPayload};
use crate::sheets::{SheetRow, SheetSink, SheetsError};
use crate::state::AppState;
use crate::twilio::{MediaFetcher, MessagingError, ReplySender};

/// Returns a canned reply and records every payload it receives.
pub struct FakeModel {
    reply: Result<&'static str, fn() -> LlmError>,
    seen: Mutex<Vec<PromptPayload>>,
}

impl FakeModel {
    pub fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: fn() -> LlmError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn last_payload(&self) -> PromptPayload {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelInvoker for FakeModel {
    async fn generate(&self, payload: &PromptPayload) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(payload.clone());
        match self.reply {
            Ok(text) => Ok(text.to_string()),
            Err(make) => Err(make()),
        }
    }
}

#[derive(Default)]
pub struct FakeMedia {
    pub bytes: Option<Bytes>,
    pub urls: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaFetcher for FakeMedia {
    async fn fetch(&self, url: &str) -> Option<Bytes> {
        self.urls.lock().unwrap().push(url.to_string());
        self.bytes.clone()
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl FakeMessenger {
    pub fn only_message(&self) -> (String, String) {
        let sent = self.sent.lock().unwrap();
        assert_eq!(sent.len(), 1, "expected exactly one reply, got {sent:?}");
        sent[0].clone()
    }
}

#[async_trait]
impl ReplySender for FakeMessenger {
    async fn send(&self, to: &str, body: &str) -> Result<(), MessagingError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSheets {
    pub fail: bool,
    pub rows: Mutex<Vec<SheetRow>>,
}

#[async_trait]
impl SheetSink for FakeSheets {
    async fn initialize(&self) -> Result<bool, SheetsError> {
        Ok(false)
    }

    async fn append(&self, row: &SheetRow) -> Result<(), SheetsError> {
        if self.fail {
            return Err(SheetsError::Api {
                status: 403,
                message: "permission denied".to_string(),
            });
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

/// Handles to every fake behind an `AppState`.
pub struct Fakes {
    pub model: Arc<FakeModel>,
    pub media: Arc<FakeMedia>,
    pub messenger: Arc<FakeMessenger>,
    pub sheets: Arc<FakeSheets>,
}

impl Fakes {
    pub fn new(model: Arc<FakeModel>) -> Self {
        Self {
            model,
            media: Arc::new(FakeMedia::default()),
            messenger: Arc::new(FakeMessenger::default()),
            sheets: Arc::new(FakeSheets::default()),
        }
    }

    pub fn with_media(mut self, bytes: Bytes) -> Self {
        self.media = Arc::new(FakeMedia {
            bytes: Some(bytes),
            ..FakeMedia::default()
        });
        self
    }

    pub fn with_failing_sheets(mut self) -> Self {
        self.sheets = Arc::new(FakeSheets {
            fail: true,
            ..FakeSheets::default()
        });
        self
    }

    pub fn state(&self) -> AppState {
        AppState {
            extractor: Extractor::with_invoker(self.model.clone()),
            media: self.media.clone(),
            messenger: self.messenger.clone(),
            sheets: self.sheets.clone(),
        }
    }
}

/// State whose model always answers `reply`.
pub fn test_state(reply: &'static str) -> (AppState, Fakes) {
    let fakes = Fakes::new(FakeModel::replying(reply));
    (fakes.state(), fakes)
}
