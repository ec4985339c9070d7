//! Shared test doubles and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use faq_rag::config::RagConfig;
use faq_rag::error::{Error, Result};
use faq_rag::generation::ChatPrompt;
use faq_rag::providers::{
    DocumentStoreProvider, EmbeddingProvider, InMemoryIndex, LlmProvider, LocalDocumentStore,
    VectorIndex, VectorSearchResult,
};
use faq_rag::server::state::AppState;
use faq_rag::types::Chunk;

pub const DIMENSIONS: usize = 16;
pub const ANSWER: &str = "<p>Refunds take five business days.</p>";

/// Deterministic bag-of-words embedder
pub struct HashEmbedder;

impl HashEmbedder {
    fn embed(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; DIMENSIONS];
        v[0] = 1.0;
        for word in text.split_whitespace() {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(7usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            v[1 + bucket % (DIMENSIONS - 1)] += 1.0;
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::embed(text))
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// LLM double that records prompts and returns a fixed answer
#[derive(Default)]
pub struct RecordingLlm {
    pub prompts: Mutex<Vec<ChatPrompt>>,
}

#[async_trait]
impl LlmProvider for RecordingLlm {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String> {
        self.prompts.lock().push(prompt.clone());
        Ok(ANSWER.to_string())
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn model(&self) -> &str {
        "recording-model"
    }
}

/// Index wrapper that injects failures into selected operations
pub struct FaultyIndex {
    pub inner: Arc<InMemoryIndex>,
    upsert_failures: AtomicUsize,
    fail_deletes: AtomicBool,
    lose_create_race: AtomicBool,
}

impl FaultyIndex {
    pub fn new(inner: Arc<InMemoryIndex>) -> Self {
        Self {
            inner,
            upsert_failures: AtomicUsize::new(0),
            fail_deletes: AtomicBool::new(false),
            lose_create_race: AtomicBool::new(false),
        }
    }

    /// Reject the next `n` upserts
    pub fn fail_next_upserts(&self, n: usize) {
        self.upsert_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Create as asked, then report that someone else got there first
    pub fn lose_create_race(&self, lose: bool) {
        self.lose_create_race.store(lose, Ordering::SeqCst);
    }
}

#[async_trait]
impl VectorIndex for FaultyIndex {
    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        self.inner.collection_exists(collection).await
    }

    async fn create_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        self.inner.create_collection(collection, dimensions).await?;
        if self.lose_create_race.load(Ordering::SeqCst) {
            return Err(Error::AlreadyExists(format!("collection `{}`", collection)));
        }
        Ok(())
    }

    async fn create_keyword_index(&self, collection: &str, field: &str) -> Result<()> {
        self.inner.create_keyword_index(collection, field).await?;
        if self.lose_create_race.load(Ordering::SeqCst) {
            return Err(Error::AlreadyExists(format!("index on `{}`", field)));
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let rejected = self
            .upsert_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(Error::vector_index("upsert rejected"));
        }
        self.inner.upsert(collection, chunks).await
    }

    async fn delete_by_filename(&self, collection: &str, filename: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::vector_index("delete rejected"));
        }
        self.inner.delete_by_filename(collection, filename).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        self.inner.search(collection, embedding, top_k).await
    }

    fn name(&self) -> &str {
        "faulty"
    }
}

/// Test application with scratch directories and in-memory services
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub index: Arc<InMemoryIndex>,
    pub llm: Arc<RecordingLlm>,
}

impl TestApp {
    pub async fn new() -> Self {
        let index = Arc::new(InMemoryIndex::new());
        Self::with_index(index.clone(), index).await
    }

    /// Build an app whose services use `service_index`; `index` is kept for inspection
    pub async fn with_index(index: Arc<InMemoryIndex>, service_index: Arc<dyn VectorIndex>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let llm = Arc::new(RecordingLlm::default());
        let store: Arc<dyn DocumentStoreProvider> =
            Arc::new(LocalDocumentStore::new(config.documents.dir.clone()));

        let state = AppState::from_parts(
            config,
            Arc::new(HashEmbedder),
            llm.clone(),
            service_index,
            store,
        )
        .await;

        Self {
            dir,
            state,
            index,
            llm,
        }
    }

    /// Build an app over a fault-injecting index
    pub async fn faulty() -> (Self, Arc<FaultyIndex>) {
        let index = Arc::new(InMemoryIndex::new());
        let faulty = Arc::new(FaultyIndex::new(index.clone()));
        let app = Self::with_index(index, faulty.clone()).await;
        (app, faulty)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.state.config().documents.dir.clone()
    }

    pub fn collection(&self) -> String {
        self.state.config().qdrant.collection_name.clone()
    }
}

pub fn test_config(dir: &TempDir) -> RagConfig {
    let mut config = RagConfig::default();
    config.qdrant.url = "http://localhost:6334".to_string();
    config.qdrant.api_key = "test-key".to_string();
    config.gemini.api_key = "test-key".to_string();
    config.qdrant.collection_name = "test_kb".to_string();
    config.documents.dir = dir.path().join("documents");
    config.server.static_dir = dir.path().join("static");
    config
}

/// Roughly `chars` characters of prose without line breaks
pub fn prose(chars: usize) -> String {
    let sentence = "Customers can request a refund within thirty days of purchase. ";
    let mut text = sentence.repeat(chars / sentence.len() + 1);
    text.truncate(chars);
    text
}
