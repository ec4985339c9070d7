//! API routes for the RAG server

pub mod documents;
pub mod query;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/query", post(query::query_rag))
        // Larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/documents", get(documents::list_documents))
        .route(
            "/documents/:filename",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "faq-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "FAQ support bot API with document upload and answers with references",
        "collection": {
            "name": state.collection().name(),
            "status": state.collection().state(),
        },
        "providers": {
            "embeddings": state.embedder_name(),
            "generation": state.llm_model(),
        },
        "max_documents": state.library().max_documents(),
        "endpoints": {
            "POST /api/query": "Answer a question with references",
            "POST /api/upload": "Upload and index a document (multipart field 'file')",
            "GET /api/documents": "List stored documents",
            "GET /api/documents/:filename": "Fetch a document (PDF bytes or text)",
            "DELETE /api/documents/:filename": "Delete a document and its vectors"
        }
    }))
}
