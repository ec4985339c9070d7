//! Document and chunk types with source tracking for references

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document, loaded page by page
    Pdf,
    /// Plain text file, loaded as a single document
    Text,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" | "markdown" => Some(Self::Text),
            _ => None,
        }
    }

    /// Detect file type from a path or filename
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Content type used when serving the raw file
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

/// Metadata stamped on every loaded document and inherited by its chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Basename of the source path; the versioning key in the index
    pub filename: String,
    /// Full source path as loaded
    pub source: String,
    /// Zero-based page index for paginated formats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ChunkMetadata {
    /// Metadata for a file loaded from `path`
    pub fn for_path(path: &Path, page: Option<u32>) -> Self {
        Self {
            filename: basename(path),
            source: path.to_string_lossy().to_string(),
            page,
        }
    }
}

/// A document as produced by the loader: one whole text file, or one PDF page
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Extracted text
    pub content: String,
    /// Source information
    pub metadata: ChunkMetadata,
}

/// A chunk of text from a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Point ID in the vector index
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector, filled in just before upsert
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Source information for references
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a new chunk without an embedding
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            embedding: Vec::new(),
            metadata,
        }
    }

    /// Attach an embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// A file present in the document store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredDocument {
    /// Filename (unique within the store)
    pub filename: String,
    /// Path on disk
    pub path: String,
    /// Size in bytes
    pub size: u64,
}

/// Raw document contents as returned to clients
#[derive(Debug, Clone)]
pub enum DocumentContent {
    /// PDF bytes, served as a file
    Pdf(Vec<u8>),
    /// Decoded text content
    Text(String),
}

/// Final path component as a string, or the whole path when it has none
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_path("report.PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_path("notes.txt"), Some(FileType::Text));
        assert_eq!(FileType::from_path("README.md"), Some(FileType::Text));
        assert_eq!(FileType::from_path("sheet.xlsx"), None);
        assert_eq!(FileType::from_path("Makefile"), None);
    }

    #[test]
    fn test_metadata_for_path() {
        let path = PathBuf::from("src/documents/faq.pdf");
        let meta = ChunkMetadata::for_path(&path, Some(2));

        assert_eq!(meta.filename, "faq.pdf");
        assert_eq!(meta.source, "src/documents/faq.pdf");
        assert_eq!(meta.page, Some(2));
    }
}
