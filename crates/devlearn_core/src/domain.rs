//! crates/devlearn_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any HTTP framework or LLM client.

use serde::{Deserialize, Serialize};

/// The three kinds of study artifacts the service can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Summary,
    McqSet,
    FlashcardSet,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Summary => "summary",
            Kind::McqSet => "mcqs",
            Kind::FlashcardSet => "flashcards",
        }
    }
}

/// An uploaded document before text extraction.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// A single generation request. Exactly one of `topic`, `text` or
/// `source_file` is the effective content source; a `source_file` is
/// extracted to plain text before prompting.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: Kind,
    pub topic: Option<String>,
    pub text: Option<String>,
    pub source_file: Option<SourceFile>,
}

impl GenerationRequest {
    pub fn from_topic(kind: Kind, topic: impl Into<String>) -> Self {
        Self {
            kind,
            topic: Some(topic.into()),
            text: None,
            source_file: None,
        }
    }

    pub fn from_text(kind: Kind, text: impl Into<String>) -> Self {
        Self {
            kind,
            topic: None,
            text: Some(text.into()),
            source_file: None,
        }
    }

    pub fn from_file(kind: Kind, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            kind,
            topic: None,
            text: None,
            source_file: Some(SourceFile {
                bytes,
                mime_type: mime_type.into(),
            }),
        }
    }

    /// The inline content source (topic or text), if this request carries one.
    pub fn inline_content(&self) -> Option<&str> {
        self.topic.as_deref().or(self.text.as_deref())
    }
}

/// A fully constructed prompt, derived deterministically from a
/// `GenerationRequest`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub system_instruction: String,
    pub user_content: String,
    pub response_format_is_json: bool,
}

/// The answer slot of a multiple-choice question.
///
/// The upstream model returns `correctAnswer` either as an option index or
/// as the literal option text. Normalization resolves both forms to an
/// index; anything it cannot resolve is kept as an explicit `Unresolved`
/// marker instead of being guessed. Unresolved answers never score as
/// correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Resolved(usize),
    Unresolved(String),
}

impl CorrectAnswer {
    pub fn index(&self) -> Option<usize> {
        match self {
            CorrectAnswer::Resolved(idx) => Some(*idx),
            CorrectAnswer::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CorrectAnswer::Resolved(_))
    }
}

/// One multiple-choice question in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqItem {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: CorrectAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::str::FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(()),
        }
    }
}

/// One flashcard in canonical form.
///
/// Missing sides stay empty here; synthesizing placeholder text is a
/// presentation-layer concern, so callers can tell "missing" apart from
/// "placeholder".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardItem {
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Length statistics reported alongside a generated summary.
///
/// `reduction_percentage` is undefined when the original text is empty, and
/// deliberately not clamped: a summary longer than its source yields a
/// negative reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub original_length: usize,
    pub summary_length: usize,
    pub reduction_percentage: Option<i32>,
    pub characters_saved: i64,
}

/// A generated summary plus its statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub content: String,
    pub stats: SummaryStats,
}

/// Generated items tagged with their provenance, so the UI can show a
/// "defaults shown" notice distinct from a real error.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent<T> {
    pub items: Vec<T>,
    pub is_default: bool,
}

impl<T> GeneratedContent<T> {
    pub fn live(items: Vec<T>) -> Self {
        Self {
            items,
            is_default: false,
        }
    }

    pub fn fallback(items: Vec<T>) -> Self {
        Self {
            items,
            is_default: true,
        }
    }
}
