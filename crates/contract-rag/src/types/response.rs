//! Response types for the HTTP API

use serde::Serialize;

use super::document::RetrievedMatch;

/// One retrieved chunk as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct ContextResult {
    pub chunk: String,
    pub tag_name: Option<String>,
    pub filename: String,
    pub page_number: u32,
    pub paragraph_number: u32,
}

impl From<&RetrievedMatch> for ContextResult {
    fn from(m: &RetrievedMatch) -> Self {
        Self {
            chunk: m.chunk.clone(),
            tag_name: m.tag_name.clone(),
            filename: m.filename.clone(),
            page_number: m.page_number,
            paragraph_number: m.paragraph_number,
        }
    }
}

/// Response for `/api/context-retrieval`
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResponse {
    pub results: Vec<ContextResult>,
}

impl RetrievalResponse {
    pub fn from_matches(matches: &[RetrievedMatch]) -> Self {
        Self {
            results: matches.iter().map(ContextResult::from).collect(),
        }
    }
}

/// Response for `/api/query`
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    /// Model answer grounded in the retrieved chunks
    pub answer: String,
    /// Chunks the answer was grounded on
    pub results: Vec<ContextResult>,
    /// Wall-clock time spent answering
    pub processing_time_ms: u64,
}

/// Response for `/api/save-document`
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub message: String,
    /// Summary of the full document text
    pub summary: String,
    /// Number of chunks written to storage
    pub chunks_stored: usize,
    /// Chunks removed because the same file was uploaded before
    pub chunks_replaced: usize,
}

/// Response for `/api/delete-document`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted: usize,
}
