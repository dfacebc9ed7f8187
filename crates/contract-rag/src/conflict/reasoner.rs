//! LLM-backed conflict reasoner

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::{PromptBuilder, NO_CONFLICT_MARKER};
use crate::providers::LlmProvider;

use super::Reasoner;

/// Asks an LLM whether a chunk conflicts with its context
pub struct LlmReasoner {
    llm: Arc<dyn LlmProvider>,
}

impl LlmReasoner {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Reasoner for LlmReasoner {
    async fn judge(&self, context: &str, candidate: &str) -> Result<String> {
        let prompt = PromptBuilder::build_conflict_prompt(context, candidate);
        let reply = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| Error::Reasoning(e.to_string()))?;
        Ok(normalize_verdict(&reply))
    }
}

/// Trim the reply and map the no-conflict marker to a blank verdict
fn normalize_verdict(reply: &str) -> String {
    let verdict = reply.trim();
    let bare = verdict.trim_end_matches('.').trim_matches(|c| c == '"' || c == '`');
    if bare.eq_ignore_ascii_case(NO_CONFLICT_MARKER) {
        String::new()
    } else {
        verdict.to_string()
    }
}
