//! Provider abstractions for embeddings, LLM completion and chunk storage
//!
//! Retrieval, conflict reasoning and summarization are built on these traits
//! so the Ollama and SQLite backends can be swapped for fakes in tests.

pub mod chunk_store;
pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod sqlite;

pub use chunk_store::ChunkStore;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProviders};
pub use sqlite::SqliteChunkStore;
