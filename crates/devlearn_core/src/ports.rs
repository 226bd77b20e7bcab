//! crates/devlearn_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like LLM providers or
//! document parsers.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::PromptSpec;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations.
///
/// The HTTP surface maps these onto status codes: `Validation` and
/// `UnsupportedDocument` become 400s and are reported before any upstream
/// call is made; the remaining variants become 500s (or trigger the static
/// default-content fallback on generation endpoints).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Bad or missing caller input.
    #[error("{0}")]
    Validation(String),
    /// The provider call itself failed (transport, auth, quota, timeout).
    #[error("AI service unavailable: {0}")]
    UpstreamUnavailable(String),
    /// The provider answered, but violated the structured-output contract.
    #[error("AI service returned malformed content: {0}")]
    MalformedResponse(String),
    /// The uploaded file's declared type is outside the supported set.
    #[error("Unsupported file type: {0}")]
    UnsupportedDocument(String),
    /// A supported document could not be read or contained no text.
    #[error("Failed to extract text from document: {0}")]
    Extraction(String),
    /// A catch-all for any other unexpected errors.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The outbound chat-completion call, one per generation request.
///
/// Implementations perform no retries; retry and fallback policy belongs to
/// the caller. When `prompt.response_format_is_json` is set, the provider is
/// asked for JSON-object output, but the returned text is handed back raw --
/// parsing (and the `MalformedResponse` classification) happens caller-side.
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    async fn generate(&self, prompt: &PromptSpec) -> PortResult<String>;
}

/// Extracts plain text from an uploaded document on disk.
#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Returns the document's text, or an `Extraction` error when the file
    /// is unreadable or yields no text after trimming.
    async fn extract_text(&self, path: &Path, mime_type: &str) -> PortResult<String>;
}
