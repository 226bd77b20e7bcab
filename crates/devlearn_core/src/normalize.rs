//! crates/devlearn_core/src/normalize.rs
//!
//! Reconciles the inconsistent shapes the model returns into the canonical
//! per-kind structures. Shape mismatches never raise errors here: items that
//! cannot be salvaged are skipped, ambiguous answers are kept as explicit
//! `Unresolved` markers, and the caller decides whether to fall back to
//! default content.

use serde_json::Value;
use tracing::warn;

use crate::domain::{CorrectAnswer, Difficulty, FlashcardItem, McqItem, SummaryResult, SummaryStats};
use crate::ports::{PortError, PortResult};

/// Parses the provider's textual payload as JSON.
///
/// A parse failure here means the call succeeded but the structured-output
/// contract was violated, which is a distinct failure mode from the provider
/// being unreachable.
pub fn parse_json_payload(raw: &str) -> PortResult<Value> {
    serde_json::from_str(raw.trim()).map_err(|e| PortError::MalformedResponse(e.to_string()))
}

/// Finds the item array in a provider payload: either under one of the
/// expected top-level keys, or the payload itself when the model skipped the
/// wrapper object.
fn item_array<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Some(items) = raw.as_array() {
        return Some(items);
    }
    keys.iter().find_map(|key| raw.get(key).and_then(Value::as_array))
}

//=========================================================================================
// MCQ Normalization
//=========================================================================================

/// Normalizes a raw MCQ payload. Accepts the array under `mcqs` or
/// `questions`; items without a question or with fewer than 2 options are
/// dropped.
pub fn normalize_mcqs(raw: &Value) -> Vec<McqItem> {
    let Some(items) = item_array(raw, &["mcqs", "questions"]) else {
        warn!("MCQ payload carried no recognizable question array");
        return Vec::new();
    };
    items.iter().filter_map(normalize_mcq_item).collect()
}

fn normalize_mcq_item(raw: &Value) -> Option<McqItem> {
    let question = string_field(raw, "question")?;
    let options: Vec<String> = raw
        .get("options")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if options.len() < 2 {
        warn!(%question, "dropping MCQ item with fewer than 2 options");
        return None;
    }
    let correct_answer = resolve_correct_answer(raw.get("correctAnswer"), &options);
    if let CorrectAnswer::Unresolved(marker) = &correct_answer {
        warn!(%question, %marker, "MCQ correctAnswer could not be resolved to an option index");
    }
    Some(McqItem {
        question,
        options,
        correct_answer,
    })
}

/// Resolves the model's `correctAnswer` to an option index.
///
/// An in-range integer is used directly; a string must match one option's
/// text exactly (after trimming). Everything else -- out-of-range indices,
/// non-matching text, a missing field -- stays `Unresolved` rather than
/// being coerced to index 0.
fn resolve_correct_answer(raw: Option<&Value>, options: &[String]) -> CorrectAnswer {
    match raw {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(idx) if (idx as usize) < options.len() => CorrectAnswer::Resolved(idx as usize),
            _ => CorrectAnswer::Unresolved(n.to_string()),
        },
        Some(Value::String(text)) => {
            let needle = text.trim();
            match options.iter().position(|opt| opt == needle) {
                Some(idx) => CorrectAnswer::Resolved(idx),
                None => CorrectAnswer::Unresolved(needle.to_string()),
            }
        }
        _ => CorrectAnswer::Unresolved(String::new()),
    }
}

//=========================================================================================
// Flashcard Normalization
//=========================================================================================

/// Normalizes a raw flashcard payload. Accepts `front`/`back` or the legacy
/// `question`/`answer` field names; the new names win when both are present.
/// Items with both sides missing are dropped; a single missing side is kept
/// empty.
pub fn normalize_flashcards(raw: &Value) -> Vec<FlashcardItem> {
    let Some(items) = item_array(raw, &["flashcards", "cards"]) else {
        warn!("flashcard payload carried no recognizable card array");
        return Vec::new();
    };
    items.iter().filter_map(normalize_flashcard_item).collect()
}

fn normalize_flashcard_item(raw: &Value) -> Option<FlashcardItem> {
    let front = string_field(raw, "front")
        .or_else(|| string_field(raw, "question"))
        .unwrap_or_default();
    let back = string_field(raw, "back")
        .or_else(|| string_field(raw, "answer"))
        .unwrap_or_default();
    if front.is_empty() && back.is_empty() {
        warn!("dropping flashcard with neither side present");
        return None;
    }

    let tags = raw
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Some(FlashcardItem {
        front,
        back,
        category: string_field(raw, "category"),
        difficulty: string_field(raw, "difficulty").and_then(|d| d.parse::<Difficulty>().ok()),
        tags,
    })
}

fn string_field(raw: &Value, name: &str) -> Option<String> {
    raw.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

//=========================================================================================
// Summary Normalization
//=========================================================================================

/// Computes the length statistics for a summary.
pub fn summary_stats(original_length: usize, summary_length: usize) -> SummaryStats {
    let reduction_percentage = if original_length == 0 {
        None
    } else {
        let ratio = summary_length as f64 / original_length as f64;
        Some((100.0 * (1.0 - ratio)).round() as i32)
    };
    SummaryStats {
        original_length,
        summary_length,
        reduction_percentage,
        characters_saved: original_length as i64 - summary_length as i64,
    }
}

/// Trims the generated summary and attaches statistics computed against the
/// original input.
pub fn normalize_summary(original: &str, content: &str) -> SummaryResult {
    let content = content.trim().to_string();
    let stats = summary_stats(original.chars().count(), content.chars().count());
    SummaryResult { content, stats }
}
