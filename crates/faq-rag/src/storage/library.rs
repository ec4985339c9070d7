//! Document library: the files users manage, kept in step with the index
//!
//! Every stored file is versioned in the collection by its filename, so
//! uploads, re-uploads and deletes always act on the filename's full point set.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ingestion::{IndexTarget, IndexingPipeline};
use crate::providers::DocumentStoreProvider;
use crate::retrieval::CollectionManager;
use crate::types::response::UploadResponse;
use crate::types::{DocumentContent, FileType, StoredDocument};

/// Message returned after a successful upload
pub const UPLOAD_MESSAGE: &str = "File uploaded and indexed successfully";

/// Reject names that could escape the documents directory or name nothing
pub fn validate_filename(filename: &str) -> Result<&str> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0')
    {
        return Err(Error::InvalidInput(format!("invalid filename: {:?}", filename)));
    }
    Ok(filename)
}

/// Reduce a client-supplied upload name to its final path component
pub fn upload_basename(raw: &str) -> Result<String> {
    let name = raw
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    validate_filename(name).map(str::to_string)
}

/// Manages the documents directory and the points derived from it
pub struct DocumentLibrary {
    store: Arc<dyn DocumentStoreProvider>,
    indexer: Arc<IndexingPipeline>,
    collection: Arc<CollectionManager>,
    max_documents: usize,
}

impl DocumentLibrary {
    /// Create a new library
    pub fn new(
        store: Arc<dyn DocumentStoreProvider>,
        indexer: Arc<IndexingPipeline>,
        collection: Arc<CollectionManager>,
        max_documents: usize,
    ) -> Self {
        Self {
            store,
            indexer,
            collection,
            max_documents,
        }
    }

    /// Maximum number of stored documents accepted by `upload`
    pub fn max_documents(&self) -> usize {
        self.max_documents
    }

    /// List stored files, sorted by filename
    pub async fn list(&self) -> Result<Vec<StoredDocument>> {
        self.store.list_documents().await
    }

    /// Fetch a stored file: raw bytes for PDFs, decoded text otherwise
    pub async fn get(&self, filename: &str) -> Result<DocumentContent> {
        let filename = validate_filename(filename)?;
        let data = self.store.get_document(filename).await?;

        match FileType::from_path(filename) {
            Some(FileType::Pdf) => Ok(DocumentContent::Pdf(data)),
            _ => String::from_utf8(data)
                .map(DocumentContent::Text)
                .map_err(|e| Error::load(filename, format!("invalid UTF-8: {}", e))),
        }
    }

    /// Remove a file and all of its points
    ///
    /// A missing file or collection is not an error, so repeating a delete succeeds.
    pub async fn delete(&self, filename: &str) -> Result<()> {
        let filename = validate_filename(filename)?;

        if self.store.delete_document(filename).await? {
            tracing::info!("Removed file '{}'", filename);
        }

        let deletion_error = |e: Error| Error::Deletion {
            filename: filename.to_string(),
            message: e.to_string(),
        };

        if !self.collection.exists().await.map_err(deletion_error)? {
            return Ok(());
        }

        tracing::info!("Removing vectors for '{}'", filename);
        self.collection
            .index()
            .delete_by_filename(self.collection.name(), filename)
            .await
            .map_err(deletion_error)
    }

    /// Store a file and index it, replacing any earlier version
    ///
    /// If indexing fails the upload is undone and the indexing error is
    /// returned: a new file is removed together with any points under its
    /// name, a re-uploaded file gets its previous bytes and points back.
    pub async fn upload(&self, raw_filename: &str, data: &[u8]) -> Result<UploadResponse> {
        let filename = upload_basename(raw_filename)?;

        let current = self.store.list_documents().await?;
        if current.len() >= self.max_documents {
            return Err(Error::LimitExceeded(self.max_documents));
        }

        let previous = match self.store.get_document(&filename).await {
            Ok(bytes) => Some(bytes),
            Err(Error::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let path = self.store.store_document(&filename, data).await?;
        tracing::info!("Stored upload '{}' ({} bytes)", filename, data.len());

        match self.indexer.index(IndexTarget::File(path)).await {
            Ok(report) => Ok(UploadResponse {
                message: UPLOAD_MESSAGE.to_string(),
                filename,
                chunks: report.chunk_count,
            }),
            Err(e) => {
                tracing::warn!("Indexing '{}' failed, rolling back upload: {}", filename, e);
                match previous {
                    Some(bytes) => self.restore_previous(&filename, &bytes).await,
                    None => self.remove_upload(&filename).await,
                }
                Err(e)
            }
        }
    }

    async fn restore_previous(&self, filename: &str, bytes: &[u8]) {
        let path = match self.store.store_document(filename, bytes).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Could not restore previous '{}': {}", filename, e);
                return;
            }
        };

        // Re-index in case the failed attempt already removed the old points
        if let Err(e) = self.indexer.index(IndexTarget::File(path)).await {
            tracing::warn!("Could not re-index previous '{}': {}", filename, e);
        }
    }

    async fn remove_upload(&self, filename: &str) {
        if let Err(e) = self.store.delete_document(filename).await {
            tracing::warn!("Could not remove '{}' after failed upload: {}", filename, e);
        }

        match self.collection.exists().await {
            Ok(true) => {
                if let Err(e) = self
                    .collection
                    .index()
                    .delete_by_filename(self.collection.name(), filename)
                    .await
                {
                    tracing::warn!("Could not remove vectors for '{}': {}", filename, e);
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Could not check collection during rollback: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("faq.pdf").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename(".").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("../secret.txt").is_err());
    }

    #[test]
    fn test_upload_basename() {
        assert_eq!(upload_basename("faq.txt").unwrap(), "faq.txt");
        assert_eq!(upload_basename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(upload_basename("C:\\Users\\me\\notes.md").unwrap(), "notes.md");
        assert!(upload_basename("dir/").is_err());
        assert!(upload_basename("..").is_err());
    }
}
