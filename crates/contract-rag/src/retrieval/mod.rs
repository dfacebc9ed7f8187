//! Similarity retrieval over stored chunks

mod semantic;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RetrievedMatch;

pub use semantic::SemanticRetriever;

/// Finds stored chunks similar to a query text
#[async_trait]
pub trait Retriever: Send + Sync {
    /// At most `limit` matches, most similar first
    ///
    /// `owner = None` searches every owner's documents. Backend failures
    /// surface as `Error::Retrieval`.
    async fn retrieve(
        &self,
        query: &str,
        owner: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RetrievedMatch>>;
}
