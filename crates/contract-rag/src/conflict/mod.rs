//! Document-level conflict checking
//!
//! A scan chunks the candidate document, retrieves stored context for every
//! chunk, asks a [`Reasoner`] for a verdict on each and condenses the
//! non-blank verdicts with one [`Summarizer`] call.

mod reasoner;
mod scanner;
mod summarizer;

use async_trait::async_trait;

use crate::error::Result;

pub use reasoner::LlmReasoner;
pub use scanner::{ConflictScanner, ScanOptions, ScanPhase};
pub use summarizer::LlmSummarizer;

/// Judges whether a candidate chunk conflicts with retrieved context
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Verdict text; blank means no conflict
    async fn judge(&self, context: &str, candidate: &str) -> Result<String>;
}

/// Produces a short summary of a text
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}
