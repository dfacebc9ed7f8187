//! LLM prompts, the Ollama client and grounded answering

pub mod answer;
pub mod ollama;
pub mod prompt;

pub use answer::AnswerGenerator;
pub use ollama::OllamaClient;
pub use prompt::{PromptBuilder, NOT_AVAILABLE_ANSWER, NO_CONFLICT_MARKER};
