//! crates/devlearn_core/src/defaults.rs
//!
//! Static fallback content served when the AI provider is unavailable or
//! returns malformed output. Deterministic; the only topic-awareness is
//! string interpolation of the topic name.

use crate::domain::{CorrectAnswer, Difficulty, FlashcardItem, McqItem, SummaryResult};
use crate::normalize;

pub const DEFAULT_CONTENT_NOTE: &str = "Default content (AI service unavailable)";

pub fn default_mcqs(topic: &str) -> Vec<McqItem> {
    vec![
        McqItem {
            question: format!("What is {topic}?"),
            options: vec![
                "A fundamental concept".to_string(),
                "A technical skill".to_string(),
                "A practical application".to_string(),
                "All of the above".to_string(),
            ],
            correct_answer: CorrectAnswer::Resolved(3),
        },
        McqItem {
            question: format!("Why is {topic} important?"),
            options: vec![
                "For learning".to_string(),
                "For career growth".to_string(),
                "For problem solving".to_string(),
                "All of the above".to_string(),
            ],
            correct_answer: CorrectAnswer::Resolved(3),
        },
    ]
}

pub fn default_flashcards(topic: &str) -> Vec<FlashcardItem> {
    vec![
        FlashcardItem {
            front: format!("What is {topic}?"),
            back: format!(
                "{topic} is an important subject. (Note: Using default content - please check \
                 your API connection)"
            ),
            category: Some("Definition".to_string()),
            difficulty: Some(Difficulty::Easy),
            tags: vec!["offline".to_string()],
        },
        FlashcardItem {
            front: format!("Key aspects of {topic}"),
            back: "This includes important concepts and applications.".to_string(),
            category: Some("Concepts".to_string()),
            difficulty: Some(Difficulty::Medium),
            tags: vec!["practical".to_string()],
        },
        FlashcardItem {
            front: format!("How to apply {topic}?"),
            back: "Can be applied in various real-world scenarios.".to_string(),
            category: Some("Application".to_string()),
            difficulty: Some(Difficulty::Medium),
            tags: vec!["practice".to_string()],
        },
    ]
}

pub fn default_summary(original_text: &str) -> SummaryResult {
    let word_count = original_text.split_whitespace().count();
    let content = format!(
        "# Summary\n\n\
         This document contains approximately {word_count} words.\n\n\
         **Key Points:**\n\
         - This is default content because the AI service is unavailable\n\
         - Please ensure your API key is valid and has available credits\n\
         - Check your internet connection\n\
         - Verify your API usage limits haven't been exceeded\n\n\
         **Note:** Connect a valid API key for AI-powered summaries and content generation."
    );
    normalize::normalize_summary(original_text, &content)
}
