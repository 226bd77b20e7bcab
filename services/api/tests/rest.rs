//! Endpoint tests driving the real router with substituted service ports.

use api_lib::config::{Config, Environment};
use api_lib::web::{api_router, state::AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use devlearn_core::domain::PromptSpec;
use devlearn_core::ports::{
    ChatCompletionService, PortError, PortResult, TextExtractionService,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

//=========================================================================================
// Mock ports
//=========================================================================================

/// Returns a canned payload and counts how often it was called.
struct StaticLlm {
    payload: String,
    calls: AtomicUsize,
}

impl StaticLlm {
    fn new(payload: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            payload: payload.into(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatCompletionService for StaticLlm {
    async fn generate(&self, _prompt: &PromptSpec) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

/// Fails every call the way a timed-out provider would.
struct UnavailableLlm;

#[async_trait]
impl ChatCompletionService for UnavailableLlm {
    async fn generate(&self, _prompt: &PromptSpec) -> PortResult<String> {
        Err(PortError::UpstreamUnavailable(
            "connection timed out".to_string(),
        ))
    }
}

/// Reads the spilled temp file back as plain text, whatever the mime type.
struct PassthroughExtractor;

#[async_trait]
impl TextExtractionService for PassthroughExtractor {
    async fn extract_text(&self, path: &Path, _mime_type: &str) -> PortResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PortError::Extraction(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).trim().to_string())
    }
}

//=========================================================================================
// Harness
//=========================================================================================

fn test_config(environment: Environment, upload_dir: PathBuf) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: tracing::Level::INFO,
        environment,
        cors_origin: "http://localhost:3000".to_string(),
        api_key: None,
        api_base: None,
        model: "test-model".to_string(),
        upload_dir,
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

fn unique_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("devlearn-rest-{}", uuid::Uuid::new_v4()))
}

fn app_with(
    llm: Arc<dyn ChatCompletionService>,
    environment: Environment,
    upload_dir: PathBuf,
) -> Router {
    let state = Arc::new(AppState {
        config: Arc::new(test_config(environment, upload_dir)),
        generation: llm,
        extractor: Arc::new(PassthroughExtractor),
    });
    api_router(state)
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(uri: &str, filename: &str, mime: &str, contents: &[u8]) -> Request<Body> {
    let boundary = "test-boundary-7d91c";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn dir_is_missing_or_empty(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[tokio::test]
async fn health_reports_the_environment() {
    let app = app_with(
        StaticLlm::new(""),
        Environment::Production,
        unique_upload_dir(),
    );
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["environment"], "production");
}

#[tokio::test]
async fn mcq_generation_passes_integer_answers_through() {
    // Scenario A: the provider returns a canonical index.
    let llm = StaticLlm::new(
        json!({"mcqs": [{
            "question": "Q1",
            "options": ["A", "B", "C", "D"],
            "correctAnswer": 1
        }]})
        .to_string(),
    );
    let app = app_with(llm, Environment::Production, unique_upload_dir());

    let response = app
        .oneshot(json_request(
            "/api/mcq/generate",
            json!({"topic": "Photosynthesis"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["topic"], "Photosynthesis");
    assert_eq!(body["mcqs"][0]["correctAnswer"], 1);
    assert_eq!(body["isDefault"], false);
    assert!(body["generatedAt"].is_string());
}

#[tokio::test]
async fn mcq_generation_resolves_literal_option_text() {
    // Scenario B: correctAnswer arrives as the option text "C".
    let llm = StaticLlm::new(
        json!({"mcqs": [{
            "question": "Q1",
            "options": ["A", "B", "C", "D"],
            "correctAnswer": "C"
        }]})
        .to_string(),
    );
    let app = app_with(llm, Environment::Production, unique_upload_dir());

    let response = app
        .oneshot(json_request(
            "/api/mcq/generate",
            json!({"topic": "Photosynthesis"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["mcqs"][0]["correctAnswer"], 2);
}

#[tokio::test]
async fn blank_topic_is_rejected_without_calling_the_provider() {
    let llm = StaticLlm::new("should never be used");
    let app = app_with(llm.clone(), Environment::Production, unique_upload_dir());

    let response = app
        .oneshot(json_request("/api/mcq/generate", json!({"topic": "   "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Topic is required"));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn summary_stats_allow_negative_reduction() {
    // Scenario C: a ten-word input summarized into something longer.
    let text = "one two three four five six seven eight nine ten";
    let llm = StaticLlm::new("x".repeat(text.len() * 3));
    let app = app_with(llm, Environment::Production, unique_upload_dir());

    let response = app
        .oneshot(json_request("/api/summary/text", json!({"text": text})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let stats = &body["stats"];
    assert_eq!(stats["originalLength"], text.chars().count());
    assert!(stats["reductionPercentage"].as_i64().unwrap() < 0);
    assert!(stats["charactersSaved"].as_i64().unwrap() < 0);
}

#[tokio::test]
async fn unsupported_upload_type_is_rejected_and_leaves_no_temp_file() {
    // Scenario D: a zip upload is refused before any extraction happens.
    let upload_dir = unique_upload_dir();
    let app = app_with(
        StaticLlm::new("unused"),
        Environment::Production,
        upload_dir.clone(),
    );

    let response = app
        .oneshot(multipart_request(
            "/api/summary/upload",
            "notes.zip",
            "application/zip",
            b"PK\x03\x04not really a document",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(dir_is_missing_or_empty(&upload_dir));
    let _ = std::fs::remove_dir_all(&upload_dir);
}

#[tokio::test]
async fn upload_summarizes_extracted_text_and_cleans_up() {
    let upload_dir = unique_upload_dir();
    let llm = StaticLlm::new("- the water cycle, condensed");
    let app = app_with(llm, Environment::Production, upload_dir.clone());

    let document = "Rain falls, evaporates and condenses again. ".repeat(4);
    let response = app
        .oneshot(multipart_request(
            "/api/summary/upload",
            "notes.txt",
            "text/plain",
            document.as_bytes(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"], "- the water cycle, condensed");
    assert!(body["stats"]["reductionPercentage"].as_i64().unwrap() > 0);
    assert!(dir_is_missing_or_empty(&upload_dir));
    let _ = std::fs::remove_dir_all(&upload_dir);
}

#[tokio::test]
async fn missing_file_part_is_rejected() {
    let app = app_with(
        StaticLlm::new("unused"),
        Environment::Production,
        unique_upload_dir(),
    );
    // A multipart body whose only field is not named "file".
    let request = {
        let boundary = "test-boundary-7d91c";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             hello\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/summary/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    };
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No file uploaded.");
}

#[tokio::test]
async fn provider_timeout_falls_back_to_default_flashcards() {
    // Scenario E: the deck is served from static defaults, tagged as such.
    let app = app_with(
        Arc::new(UnavailableLlm),
        Environment::Production,
        unique_upload_dir(),
    );

    let response = app
        .oneshot(json_request(
            "/api/flashcards/generate",
            json!({"topic": "Thermodynamics"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["isDefault"], true);
    assert!(body["note"].as_str().unwrap().contains("unavailable"));
    let fronts: Vec<&str> = body["flashcards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["front"].as_str().unwrap())
        .collect();
    assert!(fronts.iter().any(|front| front.contains("Thermodynamics")));
}

#[tokio::test]
async fn malformed_provider_json_also_falls_back() {
    let app = app_with(
        StaticLlm::new("Sure! Here are your questions: 1) ..."),
        Environment::Production,
        unique_upload_dir(),
    );
    let response = app
        .oneshot(json_request("/api/mcq/generate", json!({"topic": "Algebra"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["isDefault"], true);
    assert!(body["mcqs"][0]["question"]
        .as_str()
        .unwrap()
        .contains("Algebra"));
}

#[tokio::test]
async fn error_details_only_appear_in_development() {
    let make_request = || {
        multipart_request(
            "/api/summary/upload",
            "broken.pdf",
            "application/pdf",
            b"", // empty upload fails validation with a per-variant message
        )
    };

    let dev_app = app_with(
        StaticLlm::new("unused"),
        Environment::Development,
        unique_upload_dir(),
    );
    let dev_body = body_json(dev_app.oneshot(make_request()).await.unwrap()).await;
    assert!(dev_body.get("details").is_none() || dev_body["details"].is_string());

    let prod_app = app_with(
        StaticLlm::new("unused"),
        Environment::Production,
        unique_upload_dir(),
    );
    let prod_body = body_json(prod_app.oneshot(make_request()).await.unwrap()).await;
    assert!(prod_body.get("details").is_none());
}

#[tokio::test]
async fn validate_endpoint_compares_answer_indices() {
    let app = app_with(
        StaticLlm::new("unused"),
        Environment::Production,
        unique_upload_dir(),
    );
    let response = app
        .oneshot(json_request(
            "/api/mcq/validate",
            json!({"userAnswer": 2, "correctAnswer": 2}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["isCorrect"], true);
    assert_eq!(body["correctAnswer"], 2);
}

#[tokio::test]
async fn validate_endpoint_requires_both_fields() {
    let app = app_with(
        StaticLlm::new("unused"),
        Environment::Production,
        unique_upload_dir(),
    );
    let response = app
        .oneshot(json_request("/api/mcq/validate", json!({"userAnswer": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn default_endpoints_serve_topic_interpolated_content() {
    let app = app_with(
        StaticLlm::new("unused"),
        Environment::Production,
        unique_upload_dir(),
    );
    let response = app
        .oneshot(
            Request::get("/api/flashcards/default?topic=Chemistry")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["isDefault"], true);
    assert!(body["flashcards"][0]["front"]
        .as_str()
        .unwrap()
        .contains("Chemistry"));

    let missing_topic = app_with(
        StaticLlm::new("unused"),
        Environment::Production,
        unique_upload_dir(),
    );
    let response = missing_topic
        .oneshot(
            Request::get("/api/mcq/default")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
