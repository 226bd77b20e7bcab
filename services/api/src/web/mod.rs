pub mod generation;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

// Re-export the handlers to make them easily accessible to the binary that
// builds the web server router.
pub use rest::{
    default_flashcards_handler, default_mcqs_handler, generate_flashcards_handler,
    generate_mcqs_handler, health_handler, summarize_text_handler, summarize_upload_handler,
    validate_answer_handler,
};

/// Builds the API router over an injected state, so tests can drive the
/// exact same routes with substituted ports.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    // The body limit leaves headroom above the upload cap for multipart
    // framing; the cap itself is enforced per-file in the upload handler.
    let body_limit = app_state.config.max_upload_bytes + 64 * 1024;
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/summary/upload", post(summarize_upload_handler))
        .route("/api/summary/text", post(summarize_text_handler))
        .route("/api/mcq/generate", post(generate_mcqs_handler))
        .route("/api/mcq/validate", post(validate_answer_handler))
        .route("/api/mcq/default", get(default_mcqs_handler))
        .route("/api/flashcards/generate", post(generate_flashcards_handler))
        .route("/api/flashcards/default", get(default_flashcards_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}
