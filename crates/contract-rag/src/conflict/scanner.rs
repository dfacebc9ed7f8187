//! Per-chunk conflict scan over a whole document

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::TextChunker;
use crate::retrieval::Retriever;
use crate::types::conflict::join_findings;
use crate::types::{ConflictFinding, ConflictReport};

use super::{Reasoner, Summarizer};

/// Phase of a running scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Chunking,
    /// Judging chunk `index` (1-based) of `total`
    ScanningChunks { index: usize, total: usize },
    Summarizing,
    Done,
    Failed,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPhase::Chunking => write!(f, "chunking"),
            ScanPhase::ScanningChunks { index, total } => write!(f, "scanning chunk {}/{}", index, total),
            ScanPhase::Summarizing => write!(f, "summarizing"),
            ScanPhase::Done => write!(f, "done"),
            ScanPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Chunking and retrieval settings for a scan
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub chunker: TextChunker,
    /// Matches retrieved per chunk
    pub top_n: usize,
}

impl ScanOptions {
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            chunker: TextChunker::from_config(&config.chunking),
            top_n: config.retrieval.conflict_top_n,
        }
    }
}

/// Drives retrieval, reasoning and summarization across a document's chunks
///
/// Chunks are scanned one at a time in order. The first retrieval or
/// reasoning failure aborts the scan with the failing chunk's 1-based index;
/// no partial report is returned.
pub struct ConflictScanner {
    retriever: Arc<dyn Retriever>,
    reasoner: Arc<dyn Reasoner>,
    summarizer: Arc<dyn Summarizer>,
    options: ScanOptions,
}

impl ConflictScanner {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        reasoner: Arc<dyn Reasoner>,
        summarizer: Arc<dyn Summarizer>,
        options: ScanOptions,
    ) -> Self {
        Self {
            retriever,
            reasoner,
            summarizer,
            options,
        }
    }

    /// Scan `text` against stored documents visible under `owner`
    pub async fn scan(&self, text: &str, owner: Option<&str>) -> Result<ConflictReport> {
        let start = Instant::now();
        match self.run(text, owner).await {
            Ok(report) => {
                tracing::info!(
                    phase = %ScanPhase::Done,
                    findings = report.findings.len(),
                    "Conflict scan finished in {:.1}s",
                    start.elapsed().as_secs_f64()
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(phase = %ScanPhase::Failed, chunk = ?e.failed_chunk(), "Conflict scan failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&self, text: &str, owner: Option<&str>) -> Result<ConflictReport> {
        tracing::debug!(phase = %ScanPhase::Chunking, "Chunking {} chars", text.chars().count());
        let chunks = self.options.chunker.chunk(text);
        let total = chunks.len();

        let mut findings = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let index = i + 1;
            tracing::debug!(phase = %ScanPhase::ScanningChunks { index, total });

            if let Some(finding) = self.judge_chunk(index, chunk, owner).await? {
                findings.push(finding);
            }
        }

        tracing::debug!(phase = %ScanPhase::Summarizing, findings = findings.len());
        if findings.is_empty() {
            return Ok(ConflictReport::no_conflicts());
        }

        let complete_conflict = join_findings(&findings);
        let conflict_summary = self.summarizer.summarize(&complete_conflict).await?;

        Ok(ConflictReport {
            findings,
            conflict_summary,
            complete_conflict,
        })
    }

    async fn judge_chunk(
        &self,
        index: usize,
        chunk: &str,
        owner: Option<&str>,
    ) -> Result<Option<ConflictFinding>> {
        let matches = self
            .retriever
            .retrieve(chunk, owner, self.options.top_n)
            .await
            .map_err(|e| Error::ChunkRetrieval {
                chunk_index: index,
                source: Box::new(e),
            })?;

        let context = matches
            .iter()
            .map(|m| m.chunk.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let verdict = self
            .reasoner
            .judge(&context, chunk)
            .await
            .map_err(|e| Error::ChunkReasoning {
                chunk_index: index,
                source: Box::new(e),
            })?;

        let verdict = verdict.trim();
        if verdict.is_empty() {
            return Ok(None);
        }
        Ok(Some(ConflictFinding {
            chunk_index: index,
            verdict: verdict.to_string(),
        }))
    }
}
