//! Provider abstractions for embeddings, LLM, vector index, and document storage
//!
//! The pipelines only see the traits, so Gemini and Qdrant can be swapped for
//! the in-memory index or test doubles.

pub mod document_store;
pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod local;
pub mod memory;
pub mod qdrant;
pub mod vector_store;

pub use document_store::DocumentStoreProvider;
pub use embedding::EmbeddingProvider;
pub use gemini::{GeminiEmbedder, GeminiLlm};
pub use llm::LlmProvider;
pub use local::LocalDocumentStore;
pub use memory::InMemoryIndex;
pub use qdrant::QdrantIndex;
pub use vector_store::{VectorIndex, VectorSearchResult, FILENAME_FIELD};
