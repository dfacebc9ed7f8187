//! Embedding-based retriever

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{ChunkStore, EmbeddingProvider};
use crate::types::RetrievedMatch;

use super::Retriever;

/// Embeds the query and ranks stored chunks by similarity
pub struct SemanticRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn ChunkStore>,
}

impl SemanticRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn ChunkStore>) -> Self {
        Self { embedder, store }
    }
}

#[async_trait]
impl Retriever for SemanticRetriever {
    async fn retrieve(
        &self,
        query: &str,
        owner: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RetrievedMatch>> {
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        let matches = self
            .store
            .search(&embedding, owner, limit)
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?;

        tracing::debug!(
            "Retrieved {} match(es) via {} (owner: {})",
            matches.len(),
            self.store.name(),
            owner.unwrap_or("<all>")
        );
        Ok(matches)
    }
}
