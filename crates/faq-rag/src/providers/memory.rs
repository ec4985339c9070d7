//! In-memory vector index using cosine similarity
//!
//! Mirrors the Qdrant semantics the pipelines rely on (collections must exist
//! before use, duplicate creation is reported, filtered deletes by filename).
//! Used by the test suites in place of a Qdrant server.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::Chunk;

use super::vector_store::{VectorIndex, VectorSearchResult};

#[derive(Debug, Default)]
struct Collection {
    dimensions: usize,
    keyword_indexes: HashSet<String>,
    points: HashMap<Uuid, Chunk>,
}

/// Process-local vector index
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a collection and all its points; returns whether it existed
    pub fn drop_collection(&self, collection: &str) -> bool {
        self.collections.write().remove(collection).is_some()
    }

    /// Number of points in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
            .unwrap_or(0)
    }

    /// Whether a collection holds no points
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Number of points carrying `filename`
    pub fn count_for_filename(&self, collection: &str, filename: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|c| {
                c.points
                    .values()
                    .filter(|p| p.metadata.filename == filename)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Vector dimension a collection was created with
    pub fn dimensions(&self, collection: &str) -> Option<usize> {
        self.collections.read().get(collection).map(|c| c.dimensions)
    }

    fn missing(collection: &str) -> Error {
        Error::vector_index(format!("Collection `{}` doesn't exist!", collection))
    }
}

/// Cosine similarity, 0.0 when either vector has zero magnitude
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        Ok(self.collections.read().contains_key(collection))
    }

    async fn create_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write();
        if collections.contains_key(collection) {
            return Err(Error::AlreadyExists(format!("collection `{}`", collection)));
        }
        collections.insert(
            collection.to_string(),
            Collection {
                dimensions,
                ..Default::default()
            },
        );
        Ok(())
    }

    async fn create_keyword_index(&self, collection: &str, field: &str) -> Result<()> {
        let mut collections = self.collections.write();
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;
        if !entry.keyword_indexes.insert(field.to_string()) {
            return Err(Error::AlreadyExists(format!("index on `{}`", field)));
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write();
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;

        for chunk in chunks {
            if chunk.embedding.len() != entry.dimensions {
                return Err(Error::vector_index(format!(
                    "wrong vector dimension: expected {}, got {}",
                    entry.dimensions,
                    chunk.embedding.len()
                )));
            }
        }
        for chunk in chunks {
            entry.points.insert(chunk.id, chunk.clone());
        }
        Ok(())
    }

    async fn delete_by_filename(&self, collection: &str, filename: &str) -> Result<()> {
        let mut collections = self.collections.write();
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;
        entry.points.retain(|_, p| p.metadata.filename != filename);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        let collections = self.collections.read();
        let entry = collections
            .get(collection)
            .ok_or_else(|| Self::missing(collection))?;

        let mut scored: Vec<VectorSearchResult> = entry
            .points
            .values()
            .map(|point| VectorSearchResult {
                score: cosine_similarity(&point.embedding, embedding),
                chunk: Chunk {
                    embedding: Vec::new(),
                    ..point.clone()
                },
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
