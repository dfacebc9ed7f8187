//! LLM provider trait for prompt completion

use async_trait::async_trait;
use crate::error::Result;

/// Trait for single-shot prompt completion
///
/// Conflict reasoning, summarization and question answering all build their
/// own prompts and share this one call.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a prompt and return the model's text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
