//! Deterministic backend fakes shared by unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::conflict::{Reasoner, Summarizer};
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::Retriever;
use crate::types::{Document, FileType, RetrievedMatch};

/// Pack paragraphs into an in-memory DOCX file
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};

    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }

    let mut cursor = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

pub fn sample_document(filename: &str, owner: &str) -> Document {
    Document {
        filename: filename.to_string(),
        owner: owner.to_string(),
        tag: None,
        file_type: FileType::Pdf,
        text: String::new(),
        content_hash: "hash".to_string(),
    }
}

pub fn sample_match(chunk: &str, owner: &str) -> RetrievedMatch {
    RetrievedMatch {
        chunk: chunk.to_string(),
        tag_name: None,
        filename: "stored.pdf".to_string(),
        page_number: 1,
        paragraph_number: 1,
        owner: owner.to_string(),
        similarity: 1.0,
    }
}

/// Embeds text as letter counts plus a constant bias dimension
pub struct LetterEmbedder;

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; 27];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        v[26] = 1.0;
        Ok(v)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "letters"
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::embedding("embedder offline"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// LLM that replies with queued responses, then a fixed default, recording prompts
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String>>>,
    default_reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(default_reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: default_reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn then(self, reply: Result<String>) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_reply.clone()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Retriever returning fixed matches, optionally failing on the nth call (1-based)
pub struct FakeRetriever {
    pub matches: Vec<RetrievedMatch>,
    pub fail_on: Option<usize>,
    pub calls: Mutex<Vec<(String, Option<String>, usize)>>,
}

impl FakeRetriever {
    pub fn returning(matches: Vec<RetrievedMatch>) -> Self {
        Self {
            matches,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::returning(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Retriever for FakeRetriever {
    async fn retrieve(
        &self,
        query: &str,
        owner: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RetrievedMatch>> {
        let call = {
            let mut calls = self.calls.lock();
            calls.push((query.to_string(), owner.map(str::to_string), limit));
            calls.len()
        };
        if self.fail_on == Some(call) {
            return Err(Error::Retrieval("search service unavailable".to_string()));
        }
        Ok(self.matches.iter().take(limit).cloned().collect())
    }
}

/// Reasoner with per-call verdicts (1-based); `Err` entries fail that call
pub struct FakeReasoner {
    verdicts: Vec<std::result::Result<String, String>>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeReasoner {
    pub fn new(verdicts: Vec<std::result::Result<&str, &str>>) -> Self {
        Self {
            verdicts: verdicts
                .into_iter()
                .map(|v| v.map(str::to_string).map_err(str::to_string))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Reasoner for FakeReasoner {
    async fn judge(&self, context: &str, candidate: &str) -> Result<String> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push((context.to_string(), candidate.to_string()));
            calls.len() - 1
        };
        match self.verdicts.get(index) {
            Some(Ok(v)) => Ok(v.clone()),
            Some(Err(e)) => Err(Error::Reasoning(e.clone())),
            None => Ok(String::new()),
        }
    }
}

/// Summarizer that echoes a fixed summary and records its inputs
pub struct FakeSummarizer {
    pub summary: String,
    pub inputs: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.inputs.lock().len()
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.inputs.lock().push(text.to_string());
        Ok(self.summary.clone())
    }
}
