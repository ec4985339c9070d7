//! Document ingestion: loading, splitting, and indexing

mod chunker;
mod parser;
mod pipeline;

pub use chunker::{RecursiveTextSplitter, DEFAULT_SEPARATORS};
pub use parser::DocumentLoader;
pub use pipeline::{IndexTarget, IndexingPipeline};
