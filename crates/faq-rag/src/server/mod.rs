//! HTTP server for the RAG system

pub mod routes;
pub mod state;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::IndexTarget;
use crate::types::IndexReport;
use state::AppState;

/// Build the router with all routes for the given state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config().server.static_dir.clone();
    let max_upload_size = state.config().server.max_upload_size;

    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api", routes::api_routes(max_upload_size));

    if static_dir.is_dir() {
        router = router.nest_service("/static", ServeDir::new(static_dir));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a server with Gemini and Qdrant providers
    pub async fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Shared state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Index the documents directory once, if enabled and present
    ///
    /// Failures are logged; the server starts regardless.
    pub async fn index_on_startup(&self) -> Option<IndexReport> {
        if !self.config.documents.index_on_startup {
            tracing::info!("Startup indexing disabled");
            return None;
        }

        let dir = &self.config.documents.dir;
        if !dir.is_dir() {
            tracing::warn!(
                "Documents directory '{}' does not exist, skipping startup indexing",
                dir.display()
            );
            return None;
        }

        tracing::info!("Indexing documents in '{}'...", dir.display());
        match self.state.indexer().index(IndexTarget::Directory).await {
            Ok(report) => {
                tracing::info!(
                    "Indexed {} document(s) into {} chunk(s). Files: {}",
                    report.raw_count,
                    report.chunk_count,
                    report.files.join(", ")
                );
                Some(report)
            }
            Err(e) => {
                tracing::error!("Startup indexing failed: {}", e);
                None
            }
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = router(self.state.clone());

        tracing::info!("Starting FAQ RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Frontend page, or a status message when no frontend is installed
async fn root(State(state): State<AppState>) -> Response {
    let index_path = state.config().server.static_dir.join("index.html");
    match tokio::fs::read_to_string(&index_path).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => Json(serde_json::json!({
            "message": "FAQ Support Bot API",
            "status": "running"
        }))
        .into_response(),
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if let Err(e) = state.collection().exists().await {
        tracing::warn!("Readiness check failed: {}", e);
    }
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
