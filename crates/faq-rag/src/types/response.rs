//! Response types for queries, uploads and document management

use serde::{Deserialize, Serialize};

use super::document::StoredDocument;

/// Answer returned when the collection does not exist yet
pub const NO_DOCUMENTS_ANSWER: &str =
    "No documents have been indexed yet. Please upload and index some documents first.";

/// Answer returned when the similarity search comes back empty
pub const NO_RELEVANT_INFO_ANSWER: &str =
    "I couldn't find any relevant information in the documents to answer your question.";

/// Deduplicated, per-filename source of an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Reference ID (the filename)
    pub id: String,
    /// Source filename
    pub filename: String,
    /// Source path the chunk was loaded from
    pub source: String,
    /// Page index, 0 when not paginated
    pub page: u32,
    /// Chunk text, truncated to 200 characters
    pub preview: String,
}

/// Response from a RAG query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer (HTML fragment)
    pub answer: String,
    /// One reference per distinct source file, in retrieval order
    pub references: Vec<Reference>,
    /// Number of chunks retrieved before deduplication
    pub context_used: usize,
}

impl QueryResponse {
    /// Create a new query response
    pub fn new(answer: String, references: Vec<Reference>, context_used: usize) -> Self {
        Self {
            answer,
            references,
            context_used,
        }
    }

    /// Response when nothing has been indexed yet
    pub fn no_documents() -> Self {
        Self::new(NO_DOCUMENTS_ANSWER.to_string(), Vec::new(), 0)
    }

    /// Response when the search returned no chunks
    pub fn not_found() -> Self {
        Self::new(NO_RELEVANT_INFO_ANSWER.to_string(), Vec::new(), 0)
    }
}

/// Outcome of an indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Raw documents loaded (files, or pages for PDFs)
    pub raw_count: usize,
    /// Chunks produced and upserted
    pub chunk_count: usize,
    /// Distinct filenames touched, sorted
    pub files: Vec<String>,
}

/// Response from an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Status message
    pub message: String,
    /// Stored filename
    pub filename: String,
    /// Number of chunks indexed
    pub chunks: usize,
}

/// Response for listing documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    /// Files in the document store
    pub documents: Vec<StoredDocument>,
}

/// Text document contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTextResponse {
    /// Filename
    pub filename: String,
    /// Decoded text
    pub content: String,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Status message
    pub message: String,
}
