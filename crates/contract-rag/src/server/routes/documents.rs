//! Document save and delete endpoints

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::ingestion::{sanitize_filename, Upload};
use crate::providers::ChunkStore;
use crate::server::state::AppState;
use crate::types::{ChunkFilter, DeleteRequest, DeleteResponse, SaveResponse};

use super::UploadForm;

/// POST /api/save-document - Store a document's chunks and summarize it
pub async fn save_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<SaveResponse>> {
    let mut form = UploadForm::read(multipart?).await?;
    let username = form.username()?;
    let tag = form.non_empty("tag_name");
    let upload = Upload::from_part(form.file.take())?;

    tracing::info!(
        "Saving {} for {} ({} bytes, tag: {:?})",
        upload.filename,
        username,
        upload.data.len(),
        tag
    );

    let outcome = state.ingestor().save(upload, &username, tag).await?;

    Ok(Json(SaveResponse {
        message: "Document saved successfully.".to_string(),
        summary: outcome.summary,
        chunks_stored: outcome.chunks_stored,
        chunks_replaced: outcome.chunks_replaced,
    }))
}

/// POST /api/delete-document - Delete a user's chunks by filename and/or tag
pub async fn delete_document(
    State(state): State<AppState>,
    request: std::result::Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<DeleteResponse>> {
    let Json(request) = request?;
    let filter = delete_filter(request)?;

    let deleted = state.store().delete(&filter).await?;
    tracing::info!(
        "Deleted {} chunk(s) for {} (filename: {:?}, tag: {:?})",
        deleted,
        filter.owner,
        filter.filename,
        filter.tag
    );

    Ok(Json(DeleteResponse {
        message: "Document(s) deleted successfully.".to_string(),
        deleted,
    }))
}

/// Validate a delete request into a store filter
fn delete_filter(request: DeleteRequest) -> Result<ChunkFilter> {
    let filename = request
        .filename
        .as_deref()
        .map(sanitize_filename)
        .filter(|f| !f.is_empty());
    let tag = request.tag_name.filter(|t| !t.is_empty());

    if filename.is_none() && tag.is_none() {
        return Err(Error::validation(
            "Either 'filename' or 'tag_name' must be provided.",
        ));
    }

    let owner = request
        .username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::validation("username must be provided"))?;

    Ok(ChunkFilter {
        filename,
        tag,
        owner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_filter_sanitises_filename() {
        let filter = delete_filter(DeleteRequest {
            filename: Some("../My Lease.pdf".to_string()),
            tag_name: None,
            username: Some("ana".to_string()),
        })
        .unwrap();

        assert_eq!(filter.filename.as_deref(), Some("My_Lease.pdf"));
        assert_eq!(filter.tag, None);
        assert_eq!(filter.owner, "ana");
    }

    #[test]
    fn test_delete_filter_requires_target_then_owner() {
        let err = delete_filter(DeleteRequest {
            filename: None,
            tag_name: Some(String::new()),
            username: None,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Either 'filename' or 'tag_name' must be provided.");

        let err = delete_filter(DeleteRequest {
            filename: None,
            tag_name: Some("leases".to_string()),
            username: None,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "username must be provided");
    }
}
