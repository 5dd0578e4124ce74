use std::sync::Arc;

use crate::extraction::pipeline::Extractor;
use crate::sheets::SheetSink;
use crate::twilio::{MediaFetcher, ReplySender};

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds only clients; nothing request-scoped lives here.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Extractor,
    pub media: Arc<dyn MediaFetcher>,
    pub messenger: Arc<dyn ReplySender>,
    /// Spreadsheet the processed resumes are appended to.
    pub sheets: Arc<dyn SheetSink>,
}
