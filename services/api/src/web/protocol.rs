//! services/api/src/web/protocol.rs
//!
//! Defines the request and response payloads of the REST API. Field names
//! follow the web client's camelCase conventions.

use chrono::{DateTime, Utc};
use devlearn_core::domain::{FlashcardItem, McqItem, SummaryStats};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Requests
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct TopicRequest {
    #[serde(default)]
    pub topic: String,
}

#[derive(Deserialize, ToSchema)]
pub struct TextSummaryRequest {
    #[serde(default)]
    pub text: String,
}

/// Body of `/api/mcq/validate`. Both fields are required; they stay
/// `Option` here so their absence maps to a 400 envelope instead of a
/// framework rejection.
#[derive(Deserialize, ToSchema)]
pub struct ValidateAnswerRequest {
    #[serde(rename = "userAnswer")]
    pub user_answer: Option<i64>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<i64>,
}

#[derive(Deserialize)]
pub struct TopicQuery {
    pub topic: Option<String>,
}

//=========================================================================================
// Responses
//=========================================================================================

/// The error envelope shared by every endpoint. `details` carries the
/// internal error text only in the development environment.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: String,
    #[schema(value_type = Object)]
    pub stats: SummaryStats,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct McqSetResponse {
    pub success: bool,
    pub topic: String,
    #[schema(value_type = Vec<Object>)]
    pub mcqs: Vec<McqItem>,
    pub count: usize,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct FlashcardSetResponse {
    pub success: bool,
    pub topic: String,
    #[schema(value_type = Vec<Object>)]
    pub flashcards: Vec<FlashcardItem>,
    pub count: usize,
    #[serde(rename = "isDefault")]
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct ValidateAnswerResponse {
    pub success: bool,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
    #[serde(rename = "userAnswer")]
    pub user_answer: i64,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: i64,
}
