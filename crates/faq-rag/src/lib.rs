//! faq-rag: FAQ support bot backend
//!
//! Users upload text and PDF documents; each is split into overlapping chunks,
//! embedded with Gemini and stored in a Qdrant collection, versioned by
//! filename. Questions are answered by retrieving the nearest chunks and asking
//! a Gemini chat model, with one reference per source file.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, ChunkMetadata, FileType},
    query::QueryRequest,
    response::{IndexReport, QueryResponse, Reference},
};
