//! API routes for the contract RAG server

pub mod conflicts;
pub mod documents;
pub mod query;

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    routing::post,
    Router,
};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Uploads get the larger body limit
        .route(
            "/save-document",
            post(documents::save_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/conflict-checker",
            post(conflicts::conflict_checker).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/delete-document", post(documents::delete_document))
        .route("/context-retrieval", post(query::context_retrieval))
        .route("/query", post(query::query))
}

/// Fields of a multipart upload form
#[derive(Debug, Default)]
pub struct UploadForm {
    /// The `file` part as (client filename, bytes), if present
    pub file: Option<(String, Vec<u8>)>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read every part of the form
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "file" {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::validation(format!("Failed to read file: {}", e)))?;
                form.file = Some((filename, data.to_vec()));
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::validation(format!("Failed to read field '{}': {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A text field's value
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A text field's value, treating blank as absent
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.field(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Whether a boolean flag field is set (`true`, `1`, `yes`, `on`)
    pub fn flag(&self, name: &str) -> bool {
        self.field(name)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    /// Owner of the upload; checked after the file part is known to exist
    pub fn username(&self) -> Result<String> {
        if self.file.is_none() {
            return Err(Error::validation("No file part in the request."));
        }
        self.field("username")
            .map(str::to_string)
            .ok_or_else(|| Error::validation("No username in the request."))
    }
}
