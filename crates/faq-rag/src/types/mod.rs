//! Core types for the RAG system

pub mod document;
pub mod query;
pub mod response;

pub use document::{
    basename, Chunk, ChunkMetadata, DocumentContent, FileType, RawDocument, StoredDocument,
};
pub use query::QueryRequest;
pub use response::{IndexReport, QueryResponse, Reference};
