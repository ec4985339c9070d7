//! Collection lifecycle: probe, lazy creation, and readiness state

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorIndex, FILENAME_FIELD};

/// Text embedded to measure the vector dimension of a new collection
const DIMENSION_PROBE_TEXT: &str = "test";

/// Last observed state of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum CollectionState {
    /// Collection exists; the filename index is ensured by probe and by indexing
    Ready,
    /// Collection does not exist yet
    Empty,
    /// The vector index could not be reached
    Unavailable(String),
}

/// Owns the collection name and the knowledge of whether it exists
pub struct CollectionManager {
    index: Arc<dyn VectorIndex>,
    collection: String,
    state: RwLock<CollectionState>,
}

impl CollectionManager {
    /// Create a manager; the state is `Empty` until probed
    pub fn new(index: Arc<dyn VectorIndex>, collection: impl Into<String>) -> Self {
        Self {
            index,
            collection: collection.into(),
            state: RwLock::new(CollectionState::Empty),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.collection
    }

    /// The vector index behind this collection
    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Last recorded state
    pub fn state(&self) -> CollectionState {
        self.state.read().clone()
    }

    fn set_state(&self, state: CollectionState) {
        *self.state.write() = state;
    }

    /// Ask the index whether the collection exists and record the outcome
    ///
    /// Never fails; an unreachable index is recorded as `Unavailable`.
    pub async fn probe(&self) -> CollectionState {
        let state = match self.index.collection_exists(&self.collection).await {
            Ok(true) => match self.ensure_filename_index().await {
                Ok(()) => CollectionState::Ready,
                Err(e) => CollectionState::Unavailable(e.to_string()),
            },
            Ok(false) => CollectionState::Empty,
            Err(e) => {
                tracing::warn!("Vector index unavailable: {}", e);
                CollectionState::Unavailable(e.to_string())
            }
        };
        self.set_state(state.clone());
        state
    }

    /// Check existence, updating the recorded state; errors propagate
    pub async fn exists(&self) -> Result<bool> {
        match self.index.collection_exists(&self.collection).await {
            Ok(exists) => {
                let mut state = self.state.write();
                if !exists {
                    *state = CollectionState::Empty;
                } else if *state != CollectionState::Ready {
                    // Created elsewhere; the filename index is ensured on the next write
                    *state = CollectionState::Ready;
                }
                Ok(exists)
            }
            Err(e) => {
                self.set_state(CollectionState::Unavailable(e.to_string()));
                Err(e)
            }
        }
    }

    /// Create the collection and its filename index if missing
    pub async fn ensure_collection(&self, embedder: &dyn EmbeddingProvider) -> Result<()> {
        let exists = self.exists().await?;

        if !exists {
            let probe = embedder.embed_query(DIMENSION_PROBE_TEXT).await?;
            if probe.is_empty() {
                return Err(Error::embedding("probe embedding has no dimensions"));
            }

            match self.index.create_collection(&self.collection, probe.len()).await {
                Ok(()) => {
                    tracing::info!(
                        "Created collection '{}' with dimension {}",
                        self.collection,
                        probe.len()
                    );
                }
                Err(Error::AlreadyExists(_)) => {
                    tracing::debug!("Collection '{}' was created concurrently", self.collection);
                }
                Err(e) => return Err(e),
            }
        }

        self.ensure_filename_index().await?;
        self.set_state(CollectionState::Ready);
        Ok(())
    }

    async fn ensure_filename_index(&self) -> Result<()> {
        match self
            .index
            .create_keyword_index(&self.collection, FILENAME_FIELD)
            .await
        {
            Ok(()) | Err(Error::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::InMemoryIndex;
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.5; 8])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_probe_and_ensure() {
        let index = Arc::new(InMemoryIndex::new());
        let manager = CollectionManager::new(index.clone(), "kb");

        assert_eq!(manager.probe().await, CollectionState::Empty);

        manager.ensure_collection(&FixedEmbedder).await.unwrap();
        assert_eq!(manager.state(), CollectionState::Ready);
        assert_eq!(index.dimensions("kb"), Some(8));

        // Second call is a no-op
        manager.ensure_collection(&FixedEmbedder).await.unwrap();
        assert_eq!(manager.probe().await, CollectionState::Ready);
    }

    #[tokio::test]
    async fn test_exists_tracks_dropped_collection() {
        let index = Arc::new(InMemoryIndex::new());
        let manager = CollectionManager::new(index.clone(), "kb");
        manager.ensure_collection(&FixedEmbedder).await.unwrap();

        index.drop_collection("kb");
        assert!(!manager.exists().await.unwrap());
        assert_eq!(manager.state(), CollectionState::Empty);
    }
}
