//! services/api/src/web/generation.rs
//!
//! The per-request generation pipeline: resolve the effective content
//! source, build the prompt, call the provider, normalize the output, and
//! decide whether to substitute default content.

use crate::adapters::extract::{is_supported_mime, TempUpload};
use crate::web::state::AppState;
use devlearn_core::{
    defaults,
    domain::{
        FlashcardItem, GeneratedContent, GenerationRequest, Kind, McqItem, PromptSpec,
        SummaryResult,
    },
    normalize,
    ports::{PortError, PortResult},
    prompt::build_prompt,
};
use serde_json::Value;
use tracing::{info, warn};

/// Resolves a request's effective content to plain text.
///
/// Inline topic/text is used as-is. An uploaded file is spilled to a
/// uniquely named temp file, extracted, and the temp file is unlinked when
/// the guard drops -- on success, error and panic paths alike.
pub async fn resolve_content(state: &AppState, request: &GenerationRequest) -> PortResult<String> {
    if let Some(file) = &request.source_file {
        if !is_supported_mime(&file.mime_type) {
            return Err(PortError::UnsupportedDocument(file.mime_type.clone()));
        }
        if file.bytes.is_empty() {
            return Err(PortError::Validation("Uploaded file is empty.".to_string()));
        }
        info!(
            kind = request.kind.as_str(),
            mime_type = %file.mime_type,
            bytes = file.bytes.len(),
            "extracting uploaded document"
        );
        let upload = TempUpload::write(&state.config.upload_dir, &file.bytes).await?;
        return state
            .extractor
            .extract_text(upload.path(), &file.mime_type)
            .await;
    }

    match request.inline_content().map(str::trim) {
        Some(content) if !content.is_empty() => Ok(content.to_string()),
        _ => Err(PortError::Validation(
            "Topic is required. Please enter a subject to generate questions.".to_string(),
        )),
    }
}

/// Whether an upstream failure should be answered with static default
/// content instead of an error. Validation failures never fall back.
fn falls_back(err: &PortError) -> bool {
    matches!(
        err,
        PortError::UpstreamUnavailable(_) | PortError::MalformedResponse(_)
    )
}

async fn json_generation(state: &AppState, prompt: &PromptSpec) -> PortResult<Value> {
    let raw = state.generation.generate(prompt).await?;
    normalize::parse_json_payload(&raw)
}

/// Generates a normalized MCQ set for a topic, falling back to the static
/// defaults when the provider is unavailable or answers with malformed JSON.
pub async fn generate_mcqs(
    state: &AppState,
    topic: &str,
) -> PortResult<GeneratedContent<McqItem>> {
    let prompt = build_prompt(Kind::McqSet, topic)?;
    match json_generation(state, &prompt).await {
        Ok(payload) => {
            let items = normalize::normalize_mcqs(&payload);
            info!(topic, count = items.len(), "generated MCQ set");
            Ok(GeneratedContent::live(items))
        }
        Err(e) if falls_back(&e) => {
            warn!(topic, error = %e, "MCQ generation failed; serving default content");
            Ok(GeneratedContent::fallback(defaults::default_mcqs(topic)))
        }
        Err(e) => Err(e),
    }
}

/// Generates a normalized flashcard deck for a topic, with the same
/// fallback policy as MCQs.
pub async fn generate_flashcards(
    state: &AppState,
    topic: &str,
) -> PortResult<GeneratedContent<FlashcardItem>> {
    let prompt = build_prompt(Kind::FlashcardSet, topic)?;
    match json_generation(state, &prompt).await {
        Ok(payload) => {
            let items = normalize::normalize_flashcards(&payload);
            info!(topic, count = items.len(), "generated flashcard deck");
            Ok(GeneratedContent::live(items))
        }
        Err(e) if falls_back(&e) => {
            warn!(topic, error = %e, "flashcard generation failed; serving default content");
            Ok(GeneratedContent::fallback(defaults::default_flashcards(
                topic,
            )))
        }
        Err(e) => Err(e),
    }
}

/// Summarizes already-extracted text. Returns the result plus whether it is
/// default (offline) content.
pub async fn summarize(state: &AppState, text: &str) -> PortResult<(SummaryResult, bool)> {
    let prompt = build_prompt(Kind::Summary, text)?;
    match state.generation.generate(&prompt).await {
        Ok(raw) => Ok((normalize::normalize_summary(text, &raw), false)),
        Err(e) if falls_back(&e) => {
            warn!(error = %e, "summary generation failed; serving default content");
            Ok((defaults::default_summary(text), true))
        }
        Err(e) => Err(e),
    }
}
