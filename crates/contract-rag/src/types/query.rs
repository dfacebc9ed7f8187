//! Request types for the JSON endpoints

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request body for `/api/context-retrieval` and `/api/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalRequest {
    /// Requesting user; scopes retrieval unless `all_owners` is set
    #[serde(default)]
    pub username: Option<String>,
    /// Query text
    #[serde(default)]
    pub query: Option<String>,
    /// Number of matches to return (default from config)
    #[serde(default)]
    pub n: Option<usize>,
    /// Search every owner's documents instead of only the requester's
    #[serde(default)]
    pub all_owners: bool,
}

impl RetrievalRequest {
    /// Check required fields, returning `(query, username)`
    pub fn validate(&self) -> Result<(&str, &str)> {
        let query = self
            .query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| Error::validation("Query is required."))?;
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| Error::validation("No username in the request."))?;
        Ok((query, username))
    }

    /// Owner filter for the retriever; `None` searches all owners
    pub fn owner_filter(&self) -> Option<&str> {
        if self.all_owners {
            None
        } else {
            self.username.as_deref()
        }
    }
}

/// Request body for `/api/delete-document`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}
