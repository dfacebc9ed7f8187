//! Core types for the contract RAG system

pub mod conflict;
pub mod document;
pub mod query;
pub mod response;

pub use conflict::{ConflictFinding, ConflictReport, NO_CONFLICTS_SUMMARY};
pub use document::{Chunk, ChunkFilter, Document, FileType, RetrievedMatch};
pub use query::{DeleteRequest, RetrievalRequest};
pub use response::{AnswerResponse, ContextResult, DeleteResponse, RetrievalResponse, SaveResponse};
