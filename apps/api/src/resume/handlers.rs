//! Axum route handler for résumé uploads.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::normalize::NormalizedRecord;
use crate::resume::upload::read_pdf_upload;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    /// `None` when the record parsed but could not be saved.
    pub id: Option<Uuid>,
    pub filename: String,
    pub record: NormalizedRecord,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let upload = read_pdf_upload(&mut multipart).await?;
    info!(
        "Parsing upload '{}' ({} bytes)",
        upload.filename,
        upload.bytes.len()
    );

    let record = state.pipeline.run(upload.bytes).await?;

    // A storage failure must not cost the user their parsed result.
    let id = match state.store.insert(&record).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Failed to save parsed resume '{}': {e}", upload.filename);
            None
        }
    };

    Ok(Json(ParseResponse {
        id,
        filename: upload.filename,
        record,
    }))
}
