//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use devlearn_core::ports::{ChatCompletionService, TextExtractionService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. The service ports are injected here explicitly so tests can
/// substitute them; nothing request-scoped is shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generation: Arc<dyn ChatCompletionService>,
    pub extractor: Arc<dyn TextExtractionService>,
}
