//! Local filesystem document store

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::StoredDocument;

use super::document_store::DocumentStoreProvider;

/// Local document store using a flat directory
pub struct LocalDocumentStore {
    /// Directory to store documents
    storage_dir: PathBuf,
}

impl LocalDocumentStore {
    /// Create a store rooted at `storage_dir`
    ///
    /// The directory is created lazily on first write so that listing an
    /// absent directory simply yields nothing.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    /// Get path for a document
    fn doc_path(&self, filename: &str) -> PathBuf {
        self.storage_dir.join(filename)
    }
}

#[async_trait]
impl DocumentStoreProvider for LocalDocumentStore {
    async fn store_document(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.storage_dir).await?;

        let path = self.doc_path(filename);
        tokio::fs::write(&path, data).await?;

        tracing::debug!("Stored {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    async fn get_document(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.doc_path(filename);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::NotFound(filename.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_document(&self, filename: &str) -> Result<bool> {
        match tokio::fs::remove_file(self.doc_path(filename)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_documents(&self) -> Result<Vec<StoredDocument>> {
        let mut entries = match tokio::fs::read_dir(&self.storage_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let path = entry.path();
            docs.push(StoredDocument {
                filename: entry.file_name().to_string_lossy().to_string(),
                path: path.to_string_lossy().to_string(),
                size: meta.len(),
            });
        }

        docs.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(docs)
    }

    fn name(&self) -> &str {
        "local-filesystem"
    }
}
