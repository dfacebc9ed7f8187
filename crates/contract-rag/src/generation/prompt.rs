//! Prompt templates for conflict checks, summaries and grounded answers

use crate::types::RetrievedMatch;

/// Marker the conflict prompt asks the model to reply with when nothing conflicts
pub const NO_CONFLICT_MARKER: &str = "NO_CONFLICT";

/// Reply used when a question has no stored context to answer from
pub const NOT_AVAILABLE_ANSWER: &str = "This information is not available in the provided documents.";

/// Prompt builder for LLM calls
pub struct PromptBuilder;

impl PromptBuilder {
    /// Ask whether `candidate` conflicts with previously stored agreements
    pub fn build_conflict_prompt(context: &str, candidate: &str) -> String {
        format!(
            r#"You are an AI assistant. Use the CONTEXT below to check for conflicts with the NEW CONTRACT CHUNK.

CONTEXT:
{context}

NEW CONTRACT CHUNK:
{candidate}

QUESTION:
Does the new contract chunk conflict with any of the agreements in the context?
If so, provide the details of the conflict.
If there is no conflict, reply with exactly {marker} and nothing else.

ANSWER:"#,
            context = context,
            candidate = candidate,
            marker = NO_CONFLICT_MARKER,
        )
    }

    /// Ask for a short summary of `text`
    pub fn build_summary_prompt(text: &str) -> String {
        format!(
            r#"Summarize the following text in a few sentences. Keep names, dates, amounts and obligations exact. Do not add information that is not in the text.

TEXT:
{text}

SUMMARY:"#,
            text = text,
        )
    }

    /// Build numbered context from retrieved matches
    pub fn build_context(matches: &[RetrievedMatch]) -> String {
        let mut context = String::new();

        for (i, m) in matches.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}, Page {}, Paragraph {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                m.filename,
                m.page_number,
                m.paragraph_number,
                m.chunk
            ));
        }

        context
    }

    /// Grounded question-answering prompt
    pub fn build_answer_prompt(question: &str, matches: &[RetrievedMatch]) -> String {
        format!(
            r#"You are a contract assistant that ONLY uses information from the provided documents.

RULES:
1. ONLY use information that is EXPLICITLY stated in the CONTEXT below
2. If the answer is not in the context, respond with "{not_available}"
3. Cite every claim as [Source: filename, Page X]
4. Stay close to the source wording; do not change its meaning

CONTEXT FROM DOCUMENTS:
{context}

QUESTION: {question}

ANSWER:"#,
            not_available = NOT_AVAILABLE_ANSWER,
            context = Self::build_context(matches),
            question = question,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_match;

    #[test]
    fn test_conflict_prompt_embeds_both_texts() {
        let prompt = PromptBuilder::build_conflict_prompt("Term: 12 months", "Term: 24 months");
        assert!(prompt.contains("CONTEXT:\nTerm: 12 months"));
        assert!(prompt.contains("NEW CONTRACT CHUNK:\nTerm: 24 months"));
        assert!(prompt.contains(NO_CONFLICT_MARKER));
    }

    #[test]
    fn test_context_lists_sources_in_rank_order() {
        let context = PromptBuilder::build_context(&[
            sample_match("first clause", "ana"),
            sample_match("second clause", "ana"),
        ]);
        let first = context.find("first clause").unwrap();
        let second = context.find("second clause").unwrap();
        assert!(first < second);
        assert!(context.starts_with("[1] stored.pdf, Page 1, Paragraph 1"));
    }
}
