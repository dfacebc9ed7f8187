//! LLM-backed summarizer

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::LlmProvider;

use super::Summarizer;

pub struct LlmSummarizer {
    llm: Arc<dyn LlmProvider>,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let prompt = PromptBuilder::build_summary_prompt(text);
        let summary = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| Error::Summarization(e.to_string()))?;
        Ok(summary.trim().to_string())
    }
}
