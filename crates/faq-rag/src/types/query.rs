//! Query request types

use serde::{Deserialize, Serialize};

/// Default number of chunks retrieved per question
pub const DEFAULT_K: usize = 4;

/// Query request for RAG search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve (default: 4)
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    DEFAULT_K
}
