//! Document store provider trait for storing raw document files

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;
use crate::types::StoredDocument;

/// Trait for document storage keyed by filename
///
/// Implementations:
/// - `LocalDocumentStore`: a directory on the local filesystem
#[async_trait]
pub trait DocumentStoreProvider: Send + Sync {
    /// Store a document, replacing any file with the same name
    ///
    /// Returns the path the document was written to
    async fn store_document(&self, filename: &str, data: &[u8]) -> Result<PathBuf>;

    /// Retrieve document data, `Error::NotFound` if absent
    async fn get_document(&self, filename: &str) -> Result<Vec<u8>>;

    /// Delete a document; returns whether a file was removed
    async fn delete_document(&self, filename: &str) -> Result<bool>;

    /// List all stored documents
    async fn list_documents(&self) -> Result<Vec<StoredDocument>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
