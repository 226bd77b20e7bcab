pub mod extract;
pub mod generation_llm;

pub use extract::{DocumentExtractor, TempUpload};
pub use generation_llm::OpenAiGenerationAdapter;
