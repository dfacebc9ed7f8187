//! Question answering over retrieved chunks

use std::sync::Arc;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::types::RetrievedMatch;

use super::prompt::{PromptBuilder, NOT_AVAILABLE_ANSWER};

/// Answers questions using only retrieved context
pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Answer `question` from `matches`; no matches means no LLM call
    pub async fn answer(&self, question: &str, matches: &[RetrievedMatch]) -> Result<String> {
        if matches.is_empty() {
            return Ok(NOT_AVAILABLE_ANSWER.to_string());
        }

        tracing::info!(
            "Answering with {} over {} chunk(s)",
            self.llm.model(),
            matches.len()
        );
        let prompt = PromptBuilder::build_answer_prompt(question, matches);
        let answer = self.llm.complete(&prompt).await?;
        Ok(answer.trim().to_string())
    }
}
