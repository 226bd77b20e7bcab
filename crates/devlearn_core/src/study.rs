//! crates/devlearn_core/src/study.rs
//!
//! Explicit state machines for the browser-side study flows: upload
//! progress, flashcard review and MCQ quizzes. These mirror what the web
//! client keeps in component state; nothing here is persisted.

use std::collections::BTreeSet;

use crate::domain::{CorrectAnswer, FlashcardItem, McqItem};

//=========================================================================================
// Upload progress
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    Done,
    Failed,
}

/// Simulated upload progress.
///
/// The percentage is not derived from real byte counts: the driver advances
/// it on a timer while the request is in flight, it saturates at 90 until
/// the response arrives, then snaps to 100. `is_ticking` is the timer
/// contract -- it turns false on BOTH the success and the failure
/// transition, so the driving timer is always released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    phase: UploadPhase,
    percent: u8,
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadProgress {
    pub fn new() -> Self {
        Self {
            phase: UploadPhase::Idle,
            percent: 0,
        }
    }

    pub fn start(&mut self) {
        self.phase = UploadPhase::Uploading;
        self.percent = 0;
    }

    /// One timer tick: +10%, capped at 90 while the request is in flight.
    pub fn tick(&mut self) {
        if self.phase == UploadPhase::Uploading {
            self.percent = (self.percent + 10).min(90);
        }
    }

    pub fn complete(&mut self) {
        self.phase = UploadPhase::Done;
        self.percent = 100;
    }

    pub fn fail(&mut self) {
        self.phase = UploadPhase::Failed;
        self.percent = 0;
    }

    pub fn is_ticking(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }
}

//=========================================================================================
// Flashcard study
//=========================================================================================

/// Per-deck review state: current card, flip state, and the independent
/// mastered set. Moving between cards resets the flip but never the
/// mastery marks.
#[derive(Debug, Clone)]
pub struct FlashcardStudy {
    deck: Vec<FlashcardItem>,
    current: usize,
    back_shown: bool,
    mastered: BTreeSet<usize>,
}

impl FlashcardStudy {
    pub fn new(deck: Vec<FlashcardItem>) -> Self {
        Self {
            deck,
            current: 0,
            back_shown: false,
            mastered: BTreeSet::new(),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_card(&self) -> Option<&FlashcardItem> {
        self.deck.get(self.current)
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_back_shown(&self) -> bool {
        self.back_shown
    }

    pub fn flip(&mut self) {
        self.back_shown = !self.back_shown;
    }

    pub fn next(&mut self) {
        if self.current + 1 < self.deck.len() {
            self.current += 1;
            self.back_shown = false;
        }
    }

    pub fn prev(&mut self) {
        if self.current > 0 {
            self.current -= 1;
            self.back_shown = false;
        }
    }

    pub fn toggle_mastered(&mut self) {
        if !self.mastered.remove(&self.current) {
            self.mastered.insert(self.current);
        }
    }

    pub fn is_mastered(&self, index: usize) -> bool {
        self.mastered.contains(&index)
    }

    pub fn mastered_count(&self) -> usize {
        self.mastered.len()
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.back_shown = false;
        self.mastered.clear();
    }
}

//=========================================================================================
// MCQ quiz
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    TopicEntry,
    Answering,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

/// Quiz progress over a normalized question set: one recorded answer per
/// question index, scored on finish. `Results` is terminal until an explicit
/// reset returns to topic entry.
#[derive(Debug, Clone)]
pub struct QuizSession {
    phase: QuizPhase,
    questions: Vec<McqItem>,
    answers: Vec<Option<usize>>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::TopicEntry,
            questions: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn questions(&self) -> &[McqItem] {
        &self.questions
    }

    pub fn load(&mut self, questions: Vec<McqItem>) {
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.phase = QuizPhase::Answering;
    }

    /// Records the selected option for a question. Ignored outside the
    /// answering phase or for out-of-range indices.
    pub fn select(&mut self, question_index: usize, option_index: usize) {
        if self.phase != QuizPhase::Answering {
            return;
        }
        let Some(question) = self.questions.get(question_index) else {
            return;
        };
        if option_index < question.options.len() {
            self.answers[question_index] = Some(option_index);
        }
    }

    pub fn selected(&self, question_index: usize) -> Option<usize> {
        self.answers.get(question_index).copied().flatten()
    }

    /// Scores the recorded answers and moves to the results phase. A
    /// question whose correct answer is unresolved never scores as correct.
    pub fn finish(&mut self) -> QuizScore {
        let mut correct = 0;
        let mut answered = 0;
        for (question, answer) in self.questions.iter().zip(&self.answers) {
            if let Some(selected) = answer {
                answered += 1;
                if matches!(&question.correct_answer, CorrectAnswer::Resolved(idx) if idx == selected)
                {
                    correct += 1;
                }
            }
        }
        self.phase = QuizPhase::Results;
        QuizScore {
            correct,
            answered,
            total: self.questions.len(),
        }
    }

    pub fn reset(&mut self) {
        self.phase = QuizPhase::TopicEntry;
        self.questions.clear();
        self.answers.clear();
    }
}
