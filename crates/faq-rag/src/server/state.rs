//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::{IndexingPipeline, RecursiveTextSplitter};
use crate::providers::{
    DocumentStoreProvider, EmbeddingProvider, GeminiEmbedder, GeminiLlm, LlmProvider,
    LocalDocumentStore, QdrantIndex, VectorIndex,
};
use crate::retrieval::{CollectionManager, CollectionState, QueryPipeline};
use crate::storage::DocumentLibrary;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Collection lifecycle and the vector index behind it
    collection: Arc<CollectionManager>,
    /// Load, split, embed, upsert
    indexer: Arc<IndexingPipeline>,
    /// Retrieve and answer
    query: QueryPipeline,
    /// Stored files kept in step with the index
    library: DocumentLibrary,
    /// Embedding provider name, for diagnostics
    embedder_name: String,
    /// Generation model, for diagnostics
    llm_model: String,
}

impl AppState {
    /// Create state with Gemini, Qdrant and the local documents directory
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(GeminiEmbedder::new(&config.gemini)?);
        let llm: Arc<dyn LlmProvider> = Arc::new(GeminiLlm::new(&config.gemini)?);
        tracing::info!(
            "Gemini providers initialized (embeddings: {}, generation: {})",
            config.gemini.embedding_model,
            config.gemini.generation_model
        );

        let index: Arc<dyn VectorIndex> = Arc::new(QdrantIndex::new(&config.qdrant)?);
        tracing::info!("Qdrant client initialized for {}", config.qdrant.url);

        let store: Arc<dyn DocumentStoreProvider> =
            Arc::new(LocalDocumentStore::new(config.documents.dir.clone()));

        Ok(Self::from_parts(config, embedder, llm, index, store).await)
    }

    /// Assemble state from explicit service handles and probe the collection
    pub async fn from_parts(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndex>,
        store: Arc<dyn DocumentStoreProvider>,
    ) -> Self {
        let collection = Arc::new(CollectionManager::new(
            index,
            config.qdrant.collection_name.clone(),
        ));

        let indexer = Arc::new(IndexingPipeline::new(
            config.documents.dir.clone(),
            RecursiveTextSplitter::from_config(&config.chunking),
            Arc::clone(&embedder),
            Arc::clone(&collection),
        ));

        let query = QueryPipeline::new(Arc::clone(&embedder), Arc::clone(&llm), Arc::clone(&collection));

        let library = DocumentLibrary::new(
            store,
            Arc::clone(&indexer),
            Arc::clone(&collection),
            config.documents.max_documents,
        );

        let state = collection.probe().await;
        tracing::info!("Collection '{}' state: {:?}", collection.name(), state);

        Self {
            inner: Arc::new(AppStateInner {
                embedder_name: embedder.name().to_string(),
                llm_model: llm.model().to_string(),
                config,
                collection,
                indexer,
                query,
                library,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Collection manager
    pub fn collection(&self) -> &CollectionManager {
        &self.inner.collection
    }

    /// Indexing pipeline
    pub fn indexer(&self) -> &IndexingPipeline {
        &self.inner.indexer
    }

    /// Query pipeline
    pub fn query(&self) -> &QueryPipeline {
        &self.inner.query
    }

    /// Document library
    pub fn library(&self) -> &DocumentLibrary {
        &self.inner.library
    }

    /// Embedding provider name
    pub fn embedder_name(&self) -> &str {
        &self.inner.embedder_name
    }

    /// Generation model name
    pub fn llm_model(&self) -> &str {
        &self.inner.llm_model
    }

    /// Whether the vector index was reachable at the last check
    pub fn is_ready(&self) -> bool {
        !matches!(self.inner.collection.state(), CollectionState::Unavailable(_))
    }
}
