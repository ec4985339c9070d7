//! Query endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/query - Answer a question from the indexed documents
pub async fn query_rag(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();
    tracing::info!("Query: \"{}\" (k={})", request.question, request.k);

    let response = state.query().query(&request.question, request.k).await?;

    tracing::info!(
        "Answered with {} reference(s) from {} chunk(s) in {}ms",
        response.references.len(),
        response.context_used,
        start.elapsed().as_millis()
    );
    Ok(Json(response))
}
