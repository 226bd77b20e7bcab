//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::generation;
use crate::web::protocol::{
    ErrorResponse, FlashcardSetResponse, HealthResponse, McqSetResponse, SummaryResponse,
    TextSummaryRequest, TopicQuery, TopicRequest, ValidateAnswerRequest, ValidateAnswerResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
};
use bytes::Bytes;
use chrono::Utc;
use devlearn_core::{
    defaults::DEFAULT_CONTENT_NOTE,
    domain::{GenerationRequest, Kind},
    ports::PortError,
};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        summarize_upload_handler,
        summarize_text_handler,
        generate_mcqs_handler,
        validate_answer_handler,
        default_mcqs_handler,
        generate_flashcards_handler,
        default_flashcards_handler,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            SummaryResponse,
            McqSetResponse,
            FlashcardSetResponse,
            TopicRequest,
            TextSummaryRequest,
            ValidateAnswerRequest,
            ValidateAnswerResponse,
        )
    ),
    tags(
        (name = "DevLearn API", description = "Endpoints for AI-generated summaries, quizzes and flashcards.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Envelope Helpers
//=========================================================================================

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ErrorReply {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, None)),
    )
}

/// Maps a port error onto a status code and envelope. Validation failures
/// surface their own message; everything else gets the generic
/// `public_message`, with internals exposed through `details` only in the
/// development environment.
fn port_error_reply(state: &AppState, public_message: &str, err: &PortError) -> ErrorReply {
    let (status, message) = match err {
        PortError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        PortError::UnsupportedDocument(_) => (
            StatusCode::BAD_REQUEST,
            "Unsupported file type. Upload a TXT, PDF or Word document.".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message.to_string(),
        ),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "request failed");
    }
    let details = state
        .config
        .environment
        .is_development()
        .then(|| err.to_string());
    (status, Json(ErrorResponse::new(message, details)))
}

//=========================================================================================
// Health
//=========================================================================================

/// Service liveness probe.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Backend is running".to_string(),
        environment: state.config.environment.as_str().to_string(),
    })
}

//=========================================================================================
// Summaries
//=========================================================================================

/// Upload a document and summarize its text.
///
/// Accepts a multipart/form-data request with a single `file` part. The
/// upload is spilled to a uniquely named temp file which is removed on
/// every exit path.
#[utoipa::path(
    post,
    path = "/api/summary/upload",
    request_body(content_type = "multipart/form-data", description = "The document to summarize."),
    responses(
        (status = 200, description = "Summary generated", body = SummaryResponse),
        (status = 400, description = "Missing file, empty file or unsupported type", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn summarize_upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SummaryResponse>, ErrorReply> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Failed to read multipart data: {e}")))?
    {
        if field.name() == Some("file") {
            let mime_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read file bytes: {e}")))?;
            upload = Some((mime_type, data));
            break;
        }
    }

    let Some((mime_type, data)) = upload else {
        return Err(bad_request("No file uploaded."));
    };
    if data.len() > state.config.max_upload_bytes {
        let limit_mb = state.config.max_upload_bytes / (1024 * 1024);
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse::new(
                format!("File exceeds the {limit_mb} MB upload limit."),
                None,
            )),
        ));
    }

    let request = GenerationRequest::from_file(Kind::Summary, data.to_vec(), mime_type);
    let text = generation::resolve_content(&state, &request)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to extract text from document.", &e))?;
    let (summary, is_default) = generation::summarize(&state, &text)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to generate summary.", &e))?;

    Ok(Json(SummaryResponse {
        success: true,
        summary: summary.content,
        stats: summary.stats,
        is_default,
        note: is_default.then(|| DEFAULT_CONTENT_NOTE.to_string()),
        generated_at: Utc::now(),
    }))
}

/// Summarize a block of raw text.
#[utoipa::path(
    post,
    path = "/api/summary/text",
    request_body = TextSummaryRequest,
    responses(
        (status = 200, description = "Summary generated", body = SummaryResponse),
        (status = 400, description = "Missing or blank text", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn summarize_text_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TextSummaryRequest>,
) -> Result<Json<SummaryResponse>, ErrorReply> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(bad_request("Text is required."));
    }

    let request = GenerationRequest::from_text(Kind::Summary, text);
    let content = generation::resolve_content(&state, &request)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to generate summary.", &e))?;
    let (summary, is_default) = generation::summarize(&state, &content)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to generate summary.", &e))?;

    Ok(Json(SummaryResponse {
        success: true,
        summary: summary.content,
        stats: summary.stats,
        is_default,
        note: is_default.then(|| DEFAULT_CONTENT_NOTE.to_string()),
        generated_at: Utc::now(),
    }))
}

//=========================================================================================
// MCQs
//=========================================================================================

/// Generate a set of multiple-choice questions for a topic.
#[utoipa::path(
    post,
    path = "/api/mcq/generate",
    request_body = TopicRequest,
    responses(
        (status = 200, description = "Questions generated", body = McqSetResponse),
        (status = 400, description = "Missing or blank topic", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn generate_mcqs_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TopicRequest>,
) -> Result<Json<McqSetResponse>, ErrorReply> {
    let topic = body.topic.trim();
    if topic.is_empty() {
        return Err(bad_request(
            "Topic is required. Please enter a subject to generate questions.",
        ));
    }

    let request = GenerationRequest::from_topic(Kind::McqSet, topic);
    let content = generation::resolve_content(&state, &request)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to generate questions.", &e))?;
    let generated = generation::generate_mcqs(&state, &content)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to generate questions.", &e))?;

    Ok(Json(McqSetResponse {
        success: true,
        topic: topic.to_string(),
        count: generated.items.len(),
        mcqs: generated.items,
        is_default: generated.is_default,
        note: generated
            .is_default
            .then(|| DEFAULT_CONTENT_NOTE.to_string()),
        generated_at: Utc::now(),
    }))
}

/// Check a recorded answer against the correct option index.
#[utoipa::path(
    post,
    path = "/api/mcq/validate",
    request_body = ValidateAnswerRequest,
    responses(
        (status = 200, description = "Answer checked", body = ValidateAnswerResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse)
    )
)]
pub async fn validate_answer_handler(
    Json(body): Json<ValidateAnswerRequest>,
) -> Result<Json<ValidateAnswerResponse>, ErrorReply> {
    let (Some(user_answer), Some(correct_answer)) = (body.user_answer, body.correct_answer) else {
        return Err(bad_request(
            "Both userAnswer and correctAnswer are required",
        ));
    };
    Ok(Json(ValidateAnswerResponse {
        success: true,
        is_correct: user_answer == correct_answer,
        user_answer,
        correct_answer,
    }))
}

/// The static default question set for a topic.
#[utoipa::path(
    get,
    path = "/api/mcq/default",
    params(("topic" = String, Query, description = "Topic to interpolate into the default questions")),
    responses(
        (status = 200, description = "Default questions", body = McqSetResponse),
        (status = 400, description = "Missing topic parameter", body = ErrorResponse)
    )
)]
pub async fn default_mcqs_handler(
    Query(query): Query<TopicQuery>,
) -> Result<Json<McqSetResponse>, ErrorReply> {
    let topic = query.topic.as_deref().map(str::trim).unwrap_or_default();
    if topic.is_empty() {
        return Err(bad_request("Topic query parameter is required"));
    }

    let mcqs = devlearn_core::defaults::default_mcqs(topic);
    Ok(Json(McqSetResponse {
        success: true,
        topic: topic.to_string(),
        count: mcqs.len(),
        mcqs,
        is_default: true,
        note: Some(DEFAULT_CONTENT_NOTE.to_string()),
        generated_at: Utc::now(),
    }))
}

//=========================================================================================
// Flashcards
//=========================================================================================

/// Generate a flashcard deck for a topic.
#[utoipa::path(
    post,
    path = "/api/flashcards/generate",
    request_body = TopicRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = FlashcardSetResponse),
        (status = 400, description = "Missing or blank topic", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn generate_flashcards_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TopicRequest>,
) -> Result<Json<FlashcardSetResponse>, ErrorReply> {
    let topic = body.topic.trim();
    if topic.is_empty() {
        return Err(bad_request("Topic is required"));
    }

    let request = GenerationRequest::from_topic(Kind::FlashcardSet, topic);
    let content = generation::resolve_content(&state, &request)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to generate cards.", &e))?;
    let generated = generation::generate_flashcards(&state, &content)
        .await
        .map_err(|e| port_error_reply(&state, "Failed to generate cards.", &e))?;

    Ok(Json(FlashcardSetResponse {
        success: true,
        topic: topic.to_string(),
        count: generated.items.len(),
        flashcards: generated.items,
        is_default: generated.is_default,
        note: generated
            .is_default
            .then(|| DEFAULT_CONTENT_NOTE.to_string()),
        generated_at: Utc::now(),
    }))
}

/// The static default flashcard deck for a topic.
#[utoipa::path(
    get,
    path = "/api/flashcards/default",
    params(("topic" = String, Query, description = "Topic to interpolate into the default deck")),
    responses(
        (status = 200, description = "Default flashcards", body = FlashcardSetResponse),
        (status = 400, description = "Missing topic parameter", body = ErrorResponse)
    )
)]
pub async fn default_flashcards_handler(
    Query(query): Query<TopicQuery>,
) -> Result<Json<FlashcardSetResponse>, ErrorReply> {
    let topic = query.topic.as_deref().map(str::trim).unwrap_or_default();
    if topic.is_empty() {
        return Err(bad_request("Topic query parameter is required"));
    }

    let flashcards = devlearn_core::defaults::default_flashcards(topic);
    Ok(Json(FlashcardSetResponse {
        success: true,
        topic: topic.to_string(),
        count: flashcards.len(),
        flashcards,
        is_default: true,
        note: Some(DEFAULT_CONTENT_NOTE.to_string()),
        generated_at: Utc::now(),
    }))
}
