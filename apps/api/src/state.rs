use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Gemini client, usually wrapped in a `CachedModel`.
    pub model: Arc<dyn GenerativeModel>,
    pub extractor: Arc<dyn TextExtractor>,
}
