//! Vector index trait for storing and searching chunk embeddings

use async_trait::async_trait;
use crate::error::Result;
use crate::types::Chunk;

/// Payload path of the filename used for versioning and deletes
pub const FILENAME_FIELD: &str = "metadata.filename";

/// Search result from the vector index
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched chunk (without its embedding)
    pub chunk: Chunk,
    /// Similarity score, higher is more similar
    pub score: f32,
}

/// Trait for a remote vector index partitioned into named collections
///
/// Implementations:
/// - `QdrantIndex`: Qdrant over gRPC
/// - `InMemoryIndex`: process-local cosine search
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Check whether a collection exists
    async fn collection_exists(&self, collection: &str) -> Result<bool>;

    /// Create a collection with cosine distance
    ///
    /// Returns `Error::AlreadyExists` when the collection is already there.
    async fn create_collection(&self, collection: &str, dimensions: usize) -> Result<()>;

    /// Create a keyword payload index on `field`
    ///
    /// Returns `Error::AlreadyExists` when the index is already there.
    async fn create_keyword_index(&self, collection: &str, field: &str) -> Result<()>;

    /// Insert or replace chunks; each chunk must carry its embedding
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Delete every point whose `metadata.filename` equals `filename`
    async fn delete_by_filename(&self, collection: &str, filename: &str) -> Result<()>;

    /// Nearest-neighbour search, most similar first
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
