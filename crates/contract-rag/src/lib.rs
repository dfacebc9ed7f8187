//! contract-rag: contract conflict checking over stored agreements
//!
//! Uploaded contracts are extracted, chunked and embedded into a per-user
//! chunk store. A new contract can then be scanned chunk by chunk against
//! previously stored agreements, with an LLM judging each chunk for
//! conflicts and summarizing the findings.

pub mod config;
pub mod conflict;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::RagConfig;
pub use conflict::{ConflictScanner, Reasoner, Summarizer};
pub use error::{Error, Result};
pub use ingestion::chunk;
pub use retrieval::Retriever;
pub use types::{
    Chunk, ConflictFinding, ConflictReport, Document, FileType, RetrievedMatch,
};
