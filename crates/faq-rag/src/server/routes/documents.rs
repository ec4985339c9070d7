//! Document management endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::response::{DocumentListResponse, DocumentTextResponse, MessageResponse};
use crate::types::{DocumentContent, FileType};

/// GET /api/documents - List stored documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let documents = state.library().list().await?;
    Ok(Json(DocumentListResponse { documents }))
}

/// GET /api/documents/:filename - PDF bytes or decoded text
pub async fn get_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    match state.library().get(&filename).await? {
        DocumentContent::Pdf(data) => {
            let headers = [
                (header::CONTENT_TYPE, FileType::Pdf.mime_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename.replace('"', "")),
                ),
            ];
            Ok((headers, data).into_response())
        }
        DocumentContent::Text(content) => {
            Ok(Json(DocumentTextResponse { filename, content }).into_response())
        }
    }
}

/// DELETE /api/documents/:filename - Remove a document and its vectors
pub async fn delete_document(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.library().delete(&filename).await?;
    Ok(Json(MessageResponse {
        message: format!("Document {} deleted successfully", filename),
    }))
}
