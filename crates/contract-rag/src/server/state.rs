//! Application state for the contract RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::conflict::{ConflictScanner, LlmReasoner, LlmSummarizer, Reasoner, ScanOptions, Summarizer};
use crate::error::Result;
use crate::generation::AnswerGenerator;
use crate::ingestion::{DocumentIngestor, IngestPipeline, TextChunker};
use crate::providers::{ChunkStore, EmbeddingProvider, LlmProvider, OllamaProviders, SqliteChunkStore};
use crate::retrieval::{Retriever, SemanticRetriever};

/// Backend handles the server is assembled from
pub struct Backends {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub store: Arc<dyn ChunkStore>,
    pub retriever: Arc<dyn Retriever>,
    pub reasoner: Arc<dyn Reasoner>,
    pub summarizer: Arc<dyn Summarizer>,
    /// Model used for `/api/query` answers
    pub answer_llm: Arc<dyn LlmProvider>,
}

impl Backends {
    /// Ollama for embeddings and generation, SQLite for chunks
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let ollama = OllamaProviders::new(&config.llm)?;
        let store: Arc<dyn ChunkStore> = Arc::new(SqliteChunkStore::open(&config.storage.database_path)?);

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(ollama.embedder);
        let generator: Arc<dyn LlmProvider> = Arc::new(ollama.generator);
        let summarizer: Arc<dyn LlmProvider> = Arc::new(ollama.summarizer);

        tracing::info!(
            "Ollama at {} (embed: {}, generate: {}, summarize: {})",
            config.llm.base_url,
            config.llm.embed_model,
            generator.model(),
            summarizer.model()
        );

        Ok(Self {
            retriever: Arc::new(SemanticRetriever::new(Arc::clone(&embedder), Arc::clone(&store))),
            reasoner: Arc::new(LlmReasoner::new(Arc::clone(&generator))),
            summarizer: Arc::new(LlmSummarizer::new(summarizer)),
            answer_llm: generator,
            embedder,
            store,
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    store: Arc<dyn ChunkStore>,
    retriever: Arc<dyn Retriever>,
    ingestor: DocumentIngestor,
    scanner: ConflictScanner,
    answerer: AnswerGenerator,
}

impl AppState {
    /// Create application state with the configured backends
    pub fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!("Initializing contract RAG application state...");
        let backends = Backends::from_config(&config)?;
        Ok(Self::from_parts(config, backends))
    }

    /// Assemble state from explicit backends
    pub fn from_parts(config: RagConfig, backends: Backends) -> Self {
        let chunker = TextChunker::from_config(&config.chunking);

        let ingestor = DocumentIngestor::new(
            IngestPipeline::new(chunker),
            backends.embedder,
            Arc::clone(&backends.store),
            Arc::clone(&backends.summarizer),
        );
        let scanner = ConflictScanner::new(
            Arc::clone(&backends.retriever),
            backends.reasoner,
            backends.summarizer,
            ScanOptions::from_config(&config),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: backends.store,
                retriever: backends.retriever,
                ingestor,
                scanner,
                answerer: AnswerGenerator::new(backends.answer_llm),
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<dyn ChunkStore> {
        &self.inner.store
    }

    pub fn retriever(&self) -> &Arc<dyn Retriever> {
        &self.inner.retriever
    }

    pub fn ingestor(&self) -> &DocumentIngestor {
        &self.inner.ingestor
    }

    pub fn scanner(&self) -> &ConflictScanner {
        &self.inner.scanner
    }

    pub fn answerer(&self) -> &AnswerGenerator {
        &self.inner.answerer
    }
}
