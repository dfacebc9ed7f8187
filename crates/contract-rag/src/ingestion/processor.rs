//! Ingestion pipeline orchestration

use std::sync::Arc;
use std::time::Instant;

use crate::conflict::Summarizer;
use crate::error::{Error, Result};
use crate::providers::{ChunkStore, EmbeddingProvider};
use crate::types::{Chunk, Document, FileType};

use super::chunker::TextChunker;
use super::parser::{ExtractedText, FileParser};
use super::upload::Upload;

/// Turns extracted text into attributed chunks
#[derive(Debug, Clone, Copy)]
pub struct IngestPipeline {
    chunker: TextChunker,
}

impl IngestPipeline {
    pub fn new(chunker: TextChunker) -> Self {
        Self { chunker }
    }

    /// Build the document record for extracted text
    pub fn document(
        &self,
        filename: &str,
        file_type: FileType,
        owner: &str,
        tag: Option<String>,
        extracted: &ExtractedText,
    ) -> Document {
        Document {
            filename: filename.to_string(),
            owner: owner.to_string(),
            tag,
            file_type,
            text: extracted.text.clone(),
            content_hash: extracted.content_hash(),
        }
    }

    /// Chunk a document; paragraph numbers are 1-based chunk positions
    pub fn create_chunks(&self, doc: &Document, extracted: &ExtractedText) -> Vec<Chunk> {
        self.chunker
            .chunk_spans(&extracted.text)
            .into_iter()
            .enumerate()
            .map(|(i, span)| {
                Chunk::new(
                    doc,
                    span.as_str(&extracted.text).to_string(),
                    (i + 1) as u32,
                    extracted.page_at(span.start),
                )
            })
            .collect()
    }
}

/// Result of saving one document
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub document: Document,
    /// Summary of the full text; empty when nothing was extracted
    pub summary: String,
    pub chunks_stored: usize,
    pub chunks_replaced: usize,
}

/// Extracts, chunks, embeds, stores and summarizes uploaded documents
pub struct DocumentIngestor {
    pipeline: IngestPipeline,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
    summarizer: Arc<dyn Summarizer>,
}

impl DocumentIngestor {
    pub fn new(
        pipeline: IngestPipeline,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn ChunkStore>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            pipeline,
            embedder,
            store,
            summarizer,
        }
    }

    /// Save an upload for `owner`, replacing any earlier upload of the same file
    pub async fn save(&self, upload: Upload, owner: &str, tag: Option<String>) -> Result<IngestOutcome> {
        let start = Instant::now();
        let extracted = extract_text(upload.filename.clone(), upload.file_type, upload.data).await?;
        let document = self
            .pipeline
            .document(&upload.filename, upload.file_type, owner, tag, &extracted);

        if extracted.is_blank() {
            tracing::warn!("No text extracted from {}, nothing stored", document.filename);
            return Ok(IngestOutcome {
                document,
                summary: String::new(),
                chunks_stored: 0,
                chunks_replaced: 0,
            });
        }

        let chunks = self.pipeline.create_chunks(&document, &extracted);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let chunks: Vec<Chunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| chunk.with_embedding(embedding))
            .collect();

        let chunks_replaced = self
            .store
            .replace_document(&document.filename, owner, &chunks)
            .await?;

        let summary = self.summarizer.summarize(&document.text).await?;

        tracing::info!(
            "Saved {} for {}: {} chunks ({} replaced) in {:.1}s",
            document.filename,
            owner,
            chunks.len(),
            chunks_replaced,
            start.elapsed().as_secs_f64()
        );

        Ok(IngestOutcome {
            document,
            summary,
            chunks_stored: chunks.len(),
            chunks_replaced,
        })
    }
}

/// Run text extraction on the blocking pool
pub async fn extract_text(filename: String, file_type: FileType, data: Vec<u8>) -> Result<ExtractedText> {
    tokio::task::spawn_blocking(move || FileParser::extract(&filename, file_type, &data))
        .await
        .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))?
}
