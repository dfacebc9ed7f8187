//! Chunk store trait for persisting chunks and searching by embedding

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{Chunk, ChunkFilter, RetrievedMatch};

/// Trait for chunk storage and similarity search
///
/// Implementations:
/// - `SqliteChunkStore`: SQLite table with brute-force cosine ranking
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert chunks; each must carry its embedding
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()>;

    /// Delete every chunk matching the filter, returning how many were removed
    async fn delete(&self, filter: &ChunkFilter) -> Result<usize>;

    /// Replace all chunks of `filename` owned by `owner` with `chunks`
    ///
    /// Returns the number of chunks removed. The default deletes then inserts;
    /// backends with transactions should do both atomically.
    async fn replace_document(
        &self,
        filename: &str,
        owner: &str,
        chunks: &[Chunk],
    ) -> Result<usize> {
        let removed = self
            .delete(&ChunkFilter {
                filename: Some(filename.to_string()),
                tag: None,
                owner: owner.to_string(),
            })
            .await?;
        self.insert_chunks(chunks).await?;
        Ok(removed)
    }

    /// Most similar chunks first; `owner = None` searches every owner
    async fn search(
        &self,
        query_embedding: &[f32],
        owner: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RetrievedMatch>>;

    /// Get total number of chunks stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}
