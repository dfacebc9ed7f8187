//! Conflict checking endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::error::Result;
use crate::ingestion::{extract_text, Upload};
use crate::server::state::AppState;
use crate::types::ConflictReport;

use super::UploadForm;

/// POST /api/conflict-checker - Check an uploaded contract against stored ones
///
/// The upload is scanned but never stored. Set `all_owners` to compare
/// against every user's documents instead of only the requester's.
pub async fn conflict_checker(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ConflictReport>> {
    let mut form = UploadForm::read(multipart?).await?;
    let username = form.username()?;
    let all_owners = form.flag("all_owners");
    let upload = Upload::from_part(form.file.take())?;

    tracing::info!(
        "Conflict check of {} for {} (all owners: {})",
        upload.filename,
        username,
        all_owners
    );

    let extracted = extract_text(upload.filename, upload.file_type, upload.data).await?;
    let owner = if all_owners { None } else { Some(username.as_str()) };
    let report = state.scanner().scan(&extracted.text, owner).await?;

    Ok(Json(report))
}
