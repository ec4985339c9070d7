//! FAQ RAG server binary
//!
//! Run with: cargo run -p faq-rag --bin faq-rag-server

use faq_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faq_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                     FAQ Support Bot                       ║
║            Document Q&A with Source References            ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Missing secrets abort startup here
    let config = RagConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Qdrant: {} (collection: {})", config.qdrant.url, config.qdrant.collection_name);
    tracing::info!("  - Embedding model: {}", config.gemini.embedding_model);
    tracing::info!("  - Generation model: {}", config.gemini.generation_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Documents: {}", config.documents.dir.display());

    let server = RagServer::new(config).await?;
    server.index_on_startup().await;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/query               - Ask questions");
    println!("  POST   /api/upload              - Upload a document");
    println!("  GET    /api/documents           - List documents");
    println!("  DELETE /api/documents/:filename - Delete a document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
