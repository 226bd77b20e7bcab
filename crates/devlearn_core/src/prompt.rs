//! crates/devlearn_core/src/prompt.rs
//!
//! Builds the role-tagged prompt for each generation kind, enforcing the
//! per-kind input caps before the content is inserted.

use crate::domain::{Kind, PromptSpec};
use crate::ports::{PortError, PortResult};

/// Summaries only get truncated once the input is non-trivial; short topic
/// strings pass through whole.
pub const SUMMARY_CAP_THRESHOLD: usize = 500;
pub const SUMMARY_INPUT_CAP: usize = 10_000;
pub const FLASHCARD_INPUT_CAP: usize = 6_000;

const SUMMARY_SYSTEM: &str = "You are an academic assistant. Provide a concise summary of \
     the main educational concepts related to the provided topic or text. Use bullet points.";

const MCQ_SYSTEM: &str = "Return ONLY a JSON object with a key 'mcqs' containing an array of \
     5 objects. Each object must have: 'question' (string), 'options' (array of 4 strings), \
     and 'correctAnswer' (the integer index 0-3 of the correct option). No prose.";

const FLASHCARD_SYSTEM: &str = "Return ONLY a JSON object with a key 'flashcards' containing \
     an array of 5 objects with 'question' and 'answer'. No prose.";

/// Derives the `PromptSpec` for `kind` from the effective content source.
///
/// Fails with `Validation` when the content is empty or whitespace-only, so
/// no upstream call is ever attempted for blank input.
pub fn build_prompt(kind: Kind, content: &str) -> PortResult<PromptSpec> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(PortError::Validation(
            "Topic is required. Please enter a subject or upload a document.".to_string(),
        ));
    }

    let spec = match kind {
        Kind::Summary => {
            let input = if char_count_exceeds(trimmed, SUMMARY_CAP_THRESHOLD) {
                truncate_chars(trimmed, SUMMARY_INPUT_CAP)
            } else {
                trimmed
            };
            PromptSpec {
                system_instruction: SUMMARY_SYSTEM.to_string(),
                user_content: input.to_string(),
                response_format_is_json: false,
            }
        }
        Kind::McqSet => PromptSpec {
            system_instruction: MCQ_SYSTEM.to_string(),
            user_content: format!("Generate 5 MCQs for: {trimmed}"),
            response_format_is_json: true,
        },
        Kind::FlashcardSet => PromptSpec {
            system_instruction: FLASHCARD_SYSTEM.to_string(),
            user_content: format!(
                "Generate flashcards for: {}",
                truncate_chars(trimmed, FLASHCARD_INPUT_CAP)
            ),
            response_format_is_json: true,
        },
    };
    Ok(spec)
}

/// Truncates to at most `max_chars` characters, always on a char boundary.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn char_count_exceeds(s: &str, threshold: usize) -> bool {
    s.chars().take(threshold + 1).count() > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_is_rejected_before_any_upstream_call() {
        assert!(matches!(
            build_prompt(Kind::McqSet, "   \n\t"),
            Err(PortError::Validation(_))
        ));
        assert!(matches!(
            build_prompt(Kind::Summary, ""),
            Err(PortError::Validation(_))
        ));
    }

    #[test]
    fn mcq_prompt_requests_json_and_names_the_topic() {
        let spec = build_prompt(Kind::McqSet, "Photosynthesis").unwrap();
        assert!(spec.response_format_is_json);
        assert!(spec.user_content.contains("Photosynthesis"));
        assert!(spec.system_instruction.contains("'mcqs'"));
        assert!(spec.system_instruction.contains("correctAnswer"));
    }

    #[test]
    fn summary_prompt_is_prose_mode() {
        let spec = build_prompt(Kind::Summary, "The water cycle").unwrap();
        assert!(!spec.response_format_is_json);
        assert_eq!(spec.user_content, "The water cycle");
    }

    #[test]
    fn short_summary_input_is_not_truncated() {
        let content = "a".repeat(SUMMARY_CAP_THRESHOLD);
        let spec = build_prompt(Kind::Summary, &content).unwrap();
        assert_eq!(spec.user_content.chars().count(), SUMMARY_CAP_THRESHOLD);
    }

    #[test]
    fn long_summary_input_is_capped() {
        let content = "b".repeat(SUMMARY_INPUT_CAP + 5_000);
        let spec = build_prompt(Kind::Summary, &content).unwrap();
        assert_eq!(spec.user_content.chars().count(), SUMMARY_INPUT_CAP);
    }

    #[test]
    fn flashcard_input_is_capped() {
        let content = "c".repeat(FLASHCARD_INPUT_CAP * 2);
        let spec = build_prompt(Kind::FlashcardSet, &content).unwrap();
        // "Generate flashcards for: " prefix plus exactly the capped content.
        assert!(spec.user_content.ends_with(&"c".repeat(10)));
        assert_eq!(
            spec.user_content.chars().count(),
            "Generate flashcards for: ".chars().count() + FLASHCARD_INPUT_CAP
        );
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let content = "é".repeat(SUMMARY_INPUT_CAP + 100);
        let spec = build_prompt(Kind::Summary, &content).unwrap();
        assert_eq!(spec.user_content.chars().count(), SUMMARY_INPUT_CAP);
        assert!(spec.user_content.chars().all(|c| c == 'é'));
    }

    #[test]
    fn prompt_building_is_deterministic() {
        let a = build_prompt(Kind::FlashcardSet, "Cell biology").unwrap();
        let b = build_prompt(Kind::FlashcardSet, "Cell biology").unwrap();
        assert_eq!(a, b);
    }
}
