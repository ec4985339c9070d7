//! Upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::response::UploadResponse;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// POST /api/upload - Store a file and index it
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidInput("uploaded file has no filename".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidInput(format!("Failed to read file: {}", e)))?;

        tracing::info!("Uploading file: {} ({} bytes)", filename, data.len());
        let response = state.library().upload(&filename, &data).await?;
        return Ok(Json(response));
    }

    Err(Error::InvalidInput(format!(
        "missing multipart field '{}'",
        FILE_FIELD
    )))
}
