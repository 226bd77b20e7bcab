pub mod defaults;
pub mod domain;
pub mod normalize;
pub mod ports;
pub mod prompt;
pub mod study;

pub use domain::{
    CorrectAnswer, Difficulty, FlashcardItem, GeneratedContent, GenerationRequest, Kind, McqItem,
    PromptSpec, SourceFile, SummaryResult, SummaryStats,
};
pub use ports::{ChatCompletionService, PortError, PortResult, TextExtractionService};
