//! Indexing pipeline: load, split, embed, replace previous versions, upsert

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::CollectionManager;
use crate::types::{basename, IndexReport};

use super::chunker::RecursiveTextSplitter;
use super::parser::DocumentLoader;

/// Number of points sent per upsert request
const UPSERT_BATCH_SIZE: usize = 64;

/// What to index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTarget {
    /// Every supported file in the documents directory
    Directory,
    /// A single file
    File(PathBuf),
}

/// Turns files into points in the collection
pub struct IndexingPipeline {
    documents_dir: PathBuf,
    splitter: RecursiveTextSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: Arc<CollectionManager>,
}

impl IndexingPipeline {
    /// Create a new indexing pipeline
    pub fn new(
        documents_dir: impl Into<PathBuf>,
        splitter: RecursiveTextSplitter,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: Arc<CollectionManager>,
    ) -> Self {
        Self {
            documents_dir: documents_dir.into(),
            splitter,
            embedder,
            collection,
        }
    }

    /// Index a target, replacing all earlier points of every filename it touches
    pub async fn index(&self, target: IndexTarget) -> Result<IndexReport> {
        let raw_documents = match &target {
            IndexTarget::Directory => DocumentLoader::load_directory(&self.documents_dir).await?,
            IndexTarget::File(path) => DocumentLoader::load_file(path).await?,
        };

        // Every filename touched is replaced, even when its new version yields no chunks
        let mut files: BTreeSet<String> = raw_documents
            .iter()
            .map(|d| d.metadata.filename.clone())
            .collect();
        if let IndexTarget::File(path) = &target {
            files.insert(basename(path));
        }

        let mut chunks = self.splitter.split_documents(&raw_documents);

        let report = IndexReport {
            raw_count: raw_documents.len(),
            chunk_count: chunks.len(),
            files: files.iter().cloned().collect(),
        };

        if chunks.is_empty() {
            tracing::info!(
                "No chunks produced from {} raw document(s), nothing to upsert",
                report.raw_count
            );
            if self.collection.exists().await? {
                self.remove_points(&files).await?;
            }
            return Ok(report);
        }

        // Embed before touching the index so a provider failure leaves old points intact
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_documents(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.collection.ensure_collection(self.embedder.as_ref()).await?;

        self.remove_points(&files).await?;

        let index = self.collection.index();
        for batch in chunks.chunks(UPSERT_BATCH_SIZE) {
            index.upsert(self.collection.name(), batch).await?;
        }

        tracing::info!(
            "Indexed {} chunk(s) from {} raw document(s) across {} file(s)",
            report.chunk_count,
            report.raw_count,
            report.files.len()
        );
        Ok(report)
    }

    async fn remove_points(&self, files: &BTreeSet<String>) -> Result<()> {
        let index = self.collection.index();
        for filename in files {
            tracing::info!("Removing existing vectors for '{}'", filename);
            index.delete_by_filename(self.collection.name(), filename).await?;
        }
        Ok(())
    }
}
