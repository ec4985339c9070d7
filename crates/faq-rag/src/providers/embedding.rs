//! Embedding provider trait for generating text embeddings

use async_trait::async_trait;
use crate::error::Result;

/// Trait for generating text embeddings
///
/// Implementations:
/// - `GeminiEmbedder`: Google Generative Language API (text-embedding-004)
///
/// The vector dimension is whatever the provider returns; callers measure it
/// from a real call instead of assuming one.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a search query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed document chunks for storage
    ///
    /// Default implementation calls `embed_query` sequentially.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_query(text).await?);
        }
        Ok(embeddings)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;
}
